use crate::utils::error::{FsHelperError, Result};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(FsHelperError::invalid_value(
            field_name,
            path,
            "Path cannot be empty",
        ));
    }

    if path.contains('\0') {
        return Err(FsHelperError::invalid_value(
            field_name,
            path,
            "Path contains null bytes",
        ));
    }

    Ok(())
}

pub fn validate_one_of(field_name: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if !allowed.contains(&value) {
        return Err(FsHelperError::invalid_value(
            field_name,
            value,
            format!("Valid values: {}", allowed.join(", ")),
        ));
    }
    Ok(())
}

pub fn validate_log_name(field_name: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(FsHelperError::invalid_value(
            field_name,
            name,
            "Logger name cannot be empty or whitespace-only",
        ));
    }
    if name == "." || name == ".." {
        return Err(FsHelperError::invalid_value(
            field_name,
            name,
            "Logger name cannot be a relative path component",
        ));
    }
    Ok(())
}
