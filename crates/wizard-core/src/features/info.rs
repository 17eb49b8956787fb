//! Contract metadata - license and security contact

use serde::{Deserialize, Serialize};

use crate::contract::Contract;
use crate::Result;

pub const TAG_SECURITY_CONTACT: &str = "@custom:security-contact";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Info {
    pub security_contact: String,
    pub license: String,
}

impl Default for Info {
    fn default() -> Self {
        Self {
            security_contact: String::new(),
            license: "MIT".to_string(),
        }
    }
}

pub fn set_info(c: &mut Contract, info: &Info) -> Result<()> {
    if !info.security_contact.is_empty() {
        c.add_natspec_tag(TAG_SECURITY_CONTACT, info.security_contact.as_str())?;
    }
    if !info.license.is_empty() {
        c.set_license(info.license.as_str());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_leave_contract_untouched() {
        let mut c = Contract::new("Coin");
        set_info(&mut c, &Info::default()).unwrap();
        assert_eq!(c.license(), "MIT");
        assert!(c.natspec_tags().is_empty());
    }

    #[test]
    fn test_contact_and_license() {
        let mut c = Contract::new("Coin");
        let info = Info {
            security_contact: "security@example.com".into(),
            license: "Apache-2.0".into(),
        };
        set_info(&mut c, &info).unwrap();
        assert_eq!(c.license(), "Apache-2.0");
        assert_eq!(c.natspec_tags()[0].key, TAG_SECURITY_CONTACT);
        assert_eq!(c.natspec_tags()[0].value, "security@example.com");
    }
}
