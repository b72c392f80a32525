use crate::api::models::Utilisateur;
use anyhow::{Context, Result};
use std::io::Write;

const HEADER: [&str; 5] = ["ID", "Last Name", "First Name", "Email", "Role"];

/// Write users as CSV, one row per user
pub fn export_users_csv<W: Write>(users: &[&Utilisateur], writer: W) -> Result<usize> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(HEADER).context("Failed to write CSV header")?;

    for user in users {
        csv.write_record([
            user.id.to_string().as_str(),
            user.nom.as_deref().unwrap_or(""),
            user.prenom.as_deref().unwrap_or(""),
            user.email.as_deref().unwrap_or(""),
            user.role.as_deref().unwrap_or(""),
        ])
        .with_context(|| format!("Failed to write user {}", user.id))?;
    }

    csv.flush().context("Failed to flush CSV output")?;
    Ok(users.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_export_quotes_fields() {
        let users: Vec<Utilisateur> = serde_json::from_value(json!([
            {"id": 1, "nom": "Benali", "prenom": "Amine", "email": "a@x.dz", "role": "engineer"},
            {"id": 2, "nom": "Haddad, Jr", "email": "s@x.dz"}
        ]))
        .unwrap();
        let refs: Vec<&Utilisateur> = users.iter().collect();

        let mut out = Vec::new();
        assert_eq!(export_users_csv(&refs, &mut out).unwrap(), 2);
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "ID,Last Name,First Name,Email,Role");
        assert_eq!(lines[1], "1,Benali,Amine,a@x.dz,engineer");
        assert_eq!(lines[2], "2,\"Haddad, Jr\",,s@x.dz,");
    }
}
