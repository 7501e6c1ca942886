use std::path::PathBuf;

use tempfile::TempDir;

/// Header row matching the default catalog columns.
pub const CATALOG_HEADER: &str = "faculty_name,department,course_code,slot,style_tags,rating";

/// Test fixture providing isolated filesystem environment.
pub struct UnitTestFixture {
    pub temp_dir: TempDir,
    pub data_path: PathBuf,
}

impl Default for UnitTestFixture {
    fn default() -> Self {
        Self::new()
    }
}

impl UnitTestFixture {
    #[must_use]
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let data_path = temp_dir.path().to_path_buf();

        println!("[FIXTURE] Created temp directory: {data_path:?}");

        Self {
            temp_dir,
            data_path,
        }
    }

    /// Create a test file with content.
    #[must_use]
    pub fn create_file(&self, relative_path: &str, content: &str) -> PathBuf {
        let full_path = self.data_path.join(relative_path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent dirs");
        }
        std::fs::write(&full_path, content).expect("Failed to write file");
        println!(
            "[FIXTURE] Created file: {:?} ({} bytes)",
            full_path,
            content.len()
        );
        full_path
    }

    /// Write a catalog snapshot with the default header and the given rows.
    #[must_use]
    pub fn create_catalog(&self, name: &str, rows: &[&str]) -> PathBuf {
        let mut content = String::from(CATALOG_HEADER);
        content.push('\n');
        for row in rows {
            content.push_str(row);
            content.push('\n');
        }
        self.create_file(name, &content)
    }

    /// The three-instructor catalog used across scenario tests.
    #[must_use]
    pub fn create_sample_catalog(&self) -> PathBuf {
        self.create_catalog("ffcs_data.csv", &SAMPLE_ROWS)
    }
}

/// Rows for A (strict, 8.0), B (chill, 6.0) and C (strict + lenient, 9.0).
pub const SAMPLE_ROWS: [&str; 3] = [
    "A,SCOPE,CSE1004,A1+TA1,\"strict,project-based\",8.0",
    "B,SCOPE,CSE2001,B1,\"chill,lenient-grading\",6.0",
    "C,SENSE,ECE1004,A2,\"strict,lenient-grading\",9.0",
];

impl Drop for UnitTestFixture {
    fn drop(&mut self) {
        println!("[FIXTURE] Cleaning up temp directory: {:?}", self.data_path);
    }
}
