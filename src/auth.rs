//! Email allow-list gate for the web UI. There is no credential check.

pub const DEFAULT_DOMAINS: [&str; 4] = ["@hoichoi.tv", "@gmail.com", "@example.com", "@test.com"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub email: String,
    pub name: String,
    pub is_admin: bool,
}

pub fn check_email_domain(email: &str, domains: &[String]) -> bool {
    let email = email.trim().to_lowercase();
    domains.iter().any(|domain| email.ends_with(&domain.to_lowercase()))
}

/// `jane.doe@studio.tv` -> `Jane Doe`
pub fn display_name(email: &str) -> String {
    let local = email.trim().split('@').next().unwrap_or_default();
    local
        .replace('.', " ")
        .split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars.flat_map(|c| c.to_lowercase())).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

/// Returns the user when the email is allowed and a password was given.
pub fn login(email: &str, password: &str, domains: &[String], admins: &[String]) -> Option<User> {
    let email = email.trim();
    if email.is_empty() || password.is_empty() || !check_email_domain(email, domains) {
        return None;
    }
    Some(User {
        email: email.to_string(),
        name: display_name(email),
        is_admin: admins.iter().any(|a| a == email),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains() -> Vec<String> {
        DEFAULT_DOMAINS.iter().map(|d| d.to_string()).collect()
    }

    #[test]
    fn test_domain_check() {
        assert!(check_email_domain("someone@hoichoi.tv", &domains()));
        assert!(check_email_domain("  Someone@Gmail.COM ", &domains()));
        assert!(!check_email_domain("someone@hoichoi.tv.evil.com", &domains()));
        assert!(!check_email_domain("someone@yahoo.com", &domains()));
    }

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("jane.doe@hoichoi.tv"), "Jane Doe");
        assert_eq!(display_name("SP@hoichoi.tv"), "Sp");
    }

    #[test]
    fn test_login() {
        let admins = vec!["admin@hoichoi.tv".to_string()];
        let user = login("admin@hoichoi.tv", "x", &domains(), &admins);
        assert_eq!(
            user,
            Some(User { email: "admin@hoichoi.tv".to_string(), name: "Admin".to_string(), is_admin: true })
        );
        assert!(login("admin@hoichoi.tv", "", &domains(), &admins).is_none());
        assert!(login("someone@yahoo.com", "x", &domains(), &admins).is_none());
        assert_eq!(login("a.b@test.com", "x", &domains(), &admins).map(|u| u.is_admin), Some(false));
    }
}
