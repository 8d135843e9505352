//! SQL identifier checks for schema names.
//!
//! Table and column names cannot be bound as parameters, so every name that a
//! [`Schema`](crate::Schema) splices into SQL must pass [`validate_ident`]:
//! a single unquoted segment matching `[A-Za-z_][A-Za-z0-9_]*`.

use crate::error::{CatalogError, CatalogResult};

/// Validate a single unquoted SQL identifier.
pub fn validate_ident(name: &str) -> CatalogResult<()> {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return Err(CatalogError::validation("Identifier cannot be empty"));
    };

    if first != '_' && !first.is_ascii_alphabetic() {
        return Err(CatalogError::validation(format!(
            "Invalid identifier start character: '{first}'"
        )));
    }

    if let Some(c) = chars.find(|c| *c != '_' && !c.is_ascii_alphanumeric()) {
        return Err(CatalogError::validation(format!(
            "Invalid character in identifier '{name}': '{c}'"
        )));
    }

    Ok(())
}
