use chrono::{DateTime, Utc};
use console::style;
use serde::Serialize;

use crate::error::{FfcsError, Result};

#[derive(Serialize)]
pub struct RobotResponse<T> {
    pub status: RobotStatus,
    pub timestamp: DateTime<Utc>,
    pub version: String,
    pub data: T,
}

#[derive(Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RobotStatus {
    Ok,
    Error { code: String, message: String },
}

pub fn robot_ok<T: Serialize>(data: T) -> RobotResponse<T> {
    RobotResponse {
        status: RobotStatus::Ok,
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data,
    }
}

#[must_use]
pub fn robot_error(err: &FfcsError) -> RobotResponse<serde_json::Value> {
    RobotResponse {
        status: RobotStatus::Error {
            code: err.code().to_string(),
            message: err.to_string(),
        },
        timestamp: Utc::now(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        data: serde_json::Value::Null,
    }
}

pub fn emit_robot<T: Serialize>(response: &RobotResponse<T>) -> Result<()> {
    emit_json(response)
}

pub fn emit_json<T: Serialize>(value: &T) -> Result<()> {
    let payload = serde_json::to_string_pretty(value)?;
    println!("{payload}");
    Ok(())
}

pub struct HumanLayout {
    lines: Vec<String>,
    key_width: usize,
}

impl Default for HumanLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl HumanLayout {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            lines: Vec::new(),
            key_width: 16,
        }
    }

    pub fn title(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push(String::new());
        self
    }

    pub fn section(&mut self, text: &str) -> &mut Self {
        self.lines.push(style(text).bold().to_string());
        self.lines.push("-".repeat(text.len().max(3)));
        self
    }

    pub fn kv(&mut self, key: &str, value: &str) -> &mut Self {
        // Pad before styling so escape codes do not eat the width.
        let padded = format!("{key:width$}", width = self.key_width);
        self.lines.push(format!("{} {value}", style(padded).dim()));
        self
    }

    pub fn bullet(&mut self, text: &str) -> &mut Self {
        self.lines.push(format!("- {text}"));
        self
    }

    pub fn blank(&mut self) -> &mut Self {
        self.lines.push(String::new());
        self
    }

    pub fn push_line(&mut self, line: impl Into<String>) -> &mut Self {
        self.lines.push(line.into());
        self
    }

    #[must_use]
    pub fn build(self) -> String {
        self.lines.join("\n")
    }
}

pub fn emit_human(layout: HumanLayout) {
    println!("{}", layout.build());
}
