use tempfile::TempDir;
use vedesigner_core::{Backend, Wizard, WizardBuilder};

/// Helper function to create a wizard over a fresh local database
pub async fn create_test_wizard(user: &str) -> (TempDir, Wizard<Backend>) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_path = temp_dir.path().join("test.db");
    let wizard = WizardBuilder::new()
        .with_database_path(Some(&db_path))
        .with_user(Some(user))
        .build()
        .await
        .expect("Failed to create wizard");
    (temp_dir, wizard)
}
