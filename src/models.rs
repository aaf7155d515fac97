use serde::{Deserialize, Serialize};

// --- Records resolved from the database ---

/// Session
///
/// A login session found through the `sessions_by_token` index. The router
/// never creates, refreshes or deletes sessions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    // Cookie value the session was looked up by.
    pub token: String,
    // Ref id of the linked document in the `users` collection.
    pub user_id: String,
}

/// User
///
/// The subset of a `users` document the router needs for authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    // Ref id of the document, compared against `Game::user_id`.
    pub id: String,
    pub membership: Membership,
    // Mirrors `blacklistinfo.status`. Blacklisted users only reach /blacklist.
    pub blacklisted: bool,
}

/// Game
///
/// A registered game found through the `users_games_by_game_id` index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    pub id: String,
    // Ref id of the owning user.
    pub user_id: String,
}

/// PasswordResetToken
///
/// A pending reset found through the `password_reset_tokens_by_token` index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordResetToken {
    pub token: String,
}

/// Membership
///
/// The user's tier as stored in `data.membership`. Only the three privileged
/// values are interpreted; every other string is carried as a plain tier.
/// Comparison is exact, so `"admin"` is an ordinary tier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Membership {
    Admin,
    Owner,
    Blacklist,
    Tier(String),
}

impl Membership {
    /// True for the tiers allowed onto the admin page.
    pub fn is_staff(&self) -> bool {
        matches!(self, Membership::Admin | Membership::Owner)
    }

    pub fn as_str(&self) -> &str {
        match self {
            Membership::Admin => "Admin",
            Membership::Owner => "Owner",
            Membership::Blacklist => "Blacklist",
            Membership::Tier(tier) => tier,
        }
    }
}

impl Default for Membership {
    fn default() -> Self {
        Membership::Tier("Standard".to_string())
    }
}

impl From<String> for Membership {
    fn from(value: String) -> Self {
        match value.as_str() {
            "Admin" => Membership::Admin,
            "Owner" => Membership::Owner,
            "Blacklist" => Membership::Blacklist,
            _ => Membership::Tier(value),
        }
    }
}

impl From<&str> for Membership {
    fn from(value: &str) -> Self {
        Membership::from(value.to_string())
    }
}

impl From<Membership> for String {
    fn from(value: Membership) -> Self {
        match value {
            Membership::Tier(tier) => tier,
            other => other.as_str().to_string(),
        }
    }
}

impl std::fmt::Display for Membership {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn privileged_tiers_are_recognised_exactly() {
        assert_eq!(Membership::from("Admin"), Membership::Admin);
        assert_eq!(Membership::from("Owner"), Membership::Owner);
        assert_eq!(Membership::from("Blacklist"), Membership::Blacklist);
        assert_eq!(
            Membership::from("admin"),
            Membership::Tier("admin".to_string())
        );
    }

    #[test]
    fn only_admin_and_owner_are_staff() {
        assert!(Membership::Admin.is_staff());
        assert!(Membership::Owner.is_staff());
        assert!(!Membership::Blacklist.is_staff());
        assert!(!Membership::from("Standard").is_staff());
    }

    #[test]
    fn membership_deserializes_from_plain_string() {
        let tier: Membership = serde_json::from_str("\"Premium\"").unwrap();
        assert_eq!(tier, Membership::Tier("Premium".to_string()));
        assert_eq!(serde_json::to_string(&Membership::Owner).unwrap(), "\"Owner\"");
    }
}
