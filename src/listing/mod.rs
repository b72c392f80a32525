//! Search, filtering and pagination for the alert and user listings

pub mod export;

use crate::api::models::{Gravite, Probleme, Utilisateur};
pub use export::export_users_csv;

/// One page of a listing, 1-based
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub page: usize,
    pub per_page: usize,
    pub total: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages
    }

    /// "Showing 5-8 of 11"
    pub fn range_label(&self) -> String {
        if self.total == 0 {
            return "Showing 0 of 0".to_string();
        }
        let first = (self.page - 1) * self.per_page + 1;
        let last = first + self.items.len() - 1;
        format!("Showing {}-{} of {}", first, last, self.total)
    }
}

/// Slice `items` into the requested page; out-of-range pages are clamped
pub fn paginate<T>(items: Vec<T>, page: usize, per_page: usize) -> Page<T> {
    let per_page = per_page.max(1);
    let total = items.len();
    let total_pages = total.div_ceil(per_page).max(1);
    let page = page.clamp(1, total_pages);

    let items = items
        .into_iter()
        .skip((page - 1) * per_page)
        .take(per_page)
        .collect();

    Page {
        items,
        page,
        per_page,
        total,
        total_pages,
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}

/// Alerts matching `search` on type, well name or description, and `severity`
pub fn filter_alerts<'a>(
    alerts: &'a [Probleme],
    search: Option<&str>,
    severity: Option<Gravite>,
) -> Vec<&'a Probleme> {
    let needle = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());

    alerts
        .iter()
        .filter(|alert| severity.is_none_or(|g| alert.gravite == Some(g)))
        .filter(|alert| match &needle {
            None => true,
            Some(needle) => {
                contains_ignore_case(alert.type_label(), needle)
                    || alert.well_name().is_some_and(|w| contains_ignore_case(w, needle))
                    || alert
                        .description
                        .as_deref()
                        .is_some_and(|d| contains_ignore_case(d, needle))
            }
        })
        .collect()
}

/// Users matching `search` on last name, first name or email, and `role`
/// ("all" or none means every role)
pub fn filter_users<'a>(
    users: &'a [Utilisateur],
    search: Option<&str>,
    role: Option<&str>,
) -> Vec<&'a Utilisateur> {
    let needle = search.map(|s| s.trim().to_lowercase()).filter(|s| !s.is_empty());
    let role = role.filter(|r| !r.eq_ignore_ascii_case("all"));

    users
        .iter()
        .filter(|user| role.is_none_or(|r| user.role.as_deref().is_some_and(|ur| ur.eq_ignore_ascii_case(r))))
        .filter(|user| match &needle {
            None => true,
            Some(needle) => [&user.nom, &user.prenom, &user.email]
                .into_iter()
                .flatten()
                .any(|field| contains_ignore_case(field, needle)),
        })
        .collect()
}

/// Distinct roles in first-seen order
pub fn unique_roles(users: &[Utilisateur]) -> Vec<String> {
    let mut roles: Vec<String> = Vec::new();
    for role in users.iter().filter_map(|u| u.role.as_deref()) {
        if !roles.iter().any(|r| r == role) {
            roles.push(role.to_string());
        }
    }
    roles
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn alerts() -> Vec<Probleme> {
        serde_json::from_value(json!([
            {"id": 1, "type": "COUT", "gravite": "MAJEUR", "description": "Cement overrun",
             "operation": {"phase": {"forage": {"puit": {"nom": "HMD-12"}}}}},
            {"id": 2, "type": "DELAI", "gravite": "CRITIQUE", "description": "Rig late"},
            {"id": 3, "type": "SECURITE", "gravite": "MINEUR"}
        ]))
        .unwrap()
    }

    fn users() -> Vec<Utilisateur> {
        serde_json::from_value(json!([
            {"id": 1, "nom": "Benali", "prenom": "Amine", "email": "amine@sonatrach.dz", "role": "engineer"},
            {"id": 2, "nom": "Haddad", "prenom": "Sara", "email": "sara@sonatrach.dz", "role": "manager"},
            {"id": 3, "nom": "Kaci", "prenom": "Yacine", "email": "y.kaci@mail.dz", "role": "engineer"},
            {"id": 4, "nom": "Nobody"}
        ]))
        .unwrap()
    }

    #[test]
    fn test_paginate_clamps() {
        let page = paginate((1..=11).collect::<Vec<_>>(), 3, 4);
        assert_eq!(page.items, vec![9, 10, 11]);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.range_label(), "Showing 9-11 of 11");
        assert!(!page.has_next());

        let page = paginate((1..=11).collect::<Vec<_>>(), 9, 4);
        assert_eq!(page.page, 3);
        let page = paginate((1..=11).collect::<Vec<_>>(), 0, 4);
        assert_eq!(page.items, vec![1, 2, 3, 4]);

        let empty = paginate(Vec::<i32>::new(), 2, 8);
        assert_eq!((empty.page, empty.total_pages), (1, 1));
        assert_eq!(empty.range_label(), "Showing 0 of 0");
    }

    #[test]
    fn test_filter_alerts() {
        let alerts = alerts();
        let ids = |found: Vec<&Probleme>| found.iter().map(|a| a.id).collect::<Vec<_>>();

        assert_eq!(ids(filter_alerts(&alerts, Some("hmd"), None)), vec![1]);
        assert_eq!(ids(filter_alerts(&alerts, Some("DELAY"), None)), vec![2]);
        assert_eq!(ids(filter_alerts(&alerts, Some("rig"), None)), vec![2]);
        assert_eq!(ids(filter_alerts(&alerts, None, Some(Gravite::Mineur))), vec![3]);
        assert_eq!(ids(filter_alerts(&alerts, Some("  "), None)).len(), 3);
        assert!(filter_alerts(&alerts, Some("cement"), Some(Gravite::Critique)).is_empty());
    }

    #[test]
    fn test_filter_users() {
        let users = users();
        let ids = |found: Vec<&Utilisateur>| found.iter().map(|u| u.id).collect::<Vec<_>>();

        assert_eq!(ids(filter_users(&users, Some("sonatrach"), None)), vec![1, 2]);
        assert_eq!(ids(filter_users(&users, Some("KACI"), Some("all"))), vec![3]);
        assert_eq!(ids(filter_users(&users, None, Some("Engineer"))), vec![1, 3]);
        assert_eq!(ids(filter_users(&users, Some("sara"), Some("engineer"))).len(), 0);
        assert_eq!(unique_roles(&users), vec!["engineer", "manager"]);
    }
}
