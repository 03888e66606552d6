use serde::{Deserialize, Serialize};

/// A press contact. Identity is the email address.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
}

/// A cited source shown in the sources list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    pub name: String,
    pub url: String,
    #[serde(default)]
    pub description: String,
}

/// `meta` section of the content document.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SiteMeta {
    #[serde(default)]
    pub title: Option<String>,
    /// Target of the footer link and the "find your supervisor" fallbacks.
    #[serde(default)]
    pub supervisors_url: Option<String>,
    #[serde(default)]
    pub site_url: Option<String>,
    #[serde(default)]
    pub share_text: Option<String>,
}

/// `toasts` section of the content document. Missing entries fall back to
/// the built-in wording.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToastText {
    #[serde(default = "default_email_copied")]
    pub email_copied: String,
    #[serde(default = "default_template_copied")]
    pub template_copied: String,
    #[serde(default = "default_link_copied")]
    pub link_copied: String,
}

impl Default for ToastText {
    fn default() -> Self {
        Self {
            email_copied: default_email_copied(),
            template_copied: default_template_copied(),
            link_copied: default_link_copied(),
        }
    }
}

fn default_email_copied() -> String {
    "Email copied — paste & send".to_string()
}
fn default_template_copied() -> String {
    "Full template copied. Open your mail app and paste.".to_string()
}
fn default_link_copied() -> String {
    "Link copied. Share it anywhere.".to_string()
}

/// Contact list shown when the content document cannot be loaded.
pub const FALLBACK_CONTACTS: &[(&str, &str)] = &[
    ("Napa Valley Register", "jennifer.huffman@napanews.com"),
    ("KQED Assignment", "assignmentdesk@kqed.org"),
    ("California Globe", "katy@californiaglobe.com"),
    ("California Globe", "evan@californiaglobe.com"),
    ("News Netter", "newsnetter3@gmail.com"),
    ("KPIX CBS", "kpixnewsassign.editors@cbs.com"),
    ("KGO 7 On Your Side", "7onYourSide@kgo-tv.com"),
    ("FOX News Tips", "newstips@fox.com"),
    ("KRON 4", "BreakingNews@kron4.com"),
    ("KCRA", "news@kcra.com"),
];

pub fn fallback_contacts() -> Vec<Contact> {
    FALLBACK_CONTACTS
        .iter()
        .map(|(name, email)| Contact {
            name: name.to_string(),
            email: email.to_string(),
        })
        .collect()
}
