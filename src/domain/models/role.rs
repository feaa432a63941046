use std::fmt;

use super::ASSISTANT_NAME;
use crate::configuration::Config;
use crate::configuration::ConfigKey;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Role::User => {
                let username = Config::get(ConfigKey::Username);
                if username.is_empty() {
                    return write!(f, "User");
                }
                return write!(f, "{username}");
            }
            Role::Assistant => return write!(f, "{ASSISTANT_NAME}"),
        }
    }
}
