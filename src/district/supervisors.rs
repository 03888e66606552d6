use serde::Serialize;

use crate::bind::markup::escape_html;
use crate::compose::{mailto_url, EmailTemplate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Supervisor {
    pub name: &'static str,
    pub phone: &'static str,
    /// E.164 number for `tel:` links.
    pub tel: &'static str,
    pub email: &'static str,
}

/// Board of Supervisors main line, used for members without a direct number.
const BOARD_PHONE: &str = "(707) 253-4580";
const BOARD_TEL: &str = "+17072534580";

/// Napa County Board of Supervisors by district.
pub const SUPERVISORS: [(&str, Supervisor); 5] = [
    (
        "1",
        Supervisor {
            name: "Joelle Gallagher",
            phone: BOARD_PHONE,
            tel: BOARD_TEL,
            email: "joelle.gallagher@countyofnapa.org",
        },
    ),
    (
        "2",
        Supervisor {
            name: "Liz Alessio",
            phone: BOARD_PHONE,
            tel: BOARD_TEL,
            email: "liz.alessio@countyofnapa.org",
        },
    ),
    (
        "3",
        Supervisor {
            name: "Anne Cottrell",
            phone: "(707) 253-4827",
            tel: "+17072534827",
            email: "anne.cottrell@countyofnapa.org",
        },
    ),
    (
        "4",
        Supervisor {
            name: "Amber Manfree",
            phone: BOARD_PHONE,
            tel: BOARD_TEL,
            email: "amber.manfree@countyofnapa.org",
        },
    ),
    (
        "5",
        Supervisor {
            name: "Belia Ramos",
            phone: BOARD_PHONE,
            tel: BOARD_TEL,
            email: "belia.ramos@countyofnapa.org",
        },
    ),
];

/// Shown when the spatial layer returns a district the table doesn't know.
pub const CLERK_OF_THE_BOARD: Supervisor = Supervisor {
    name: "Clerk of the Board",
    phone: BOARD_PHONE,
    tel: BOARD_TEL,
    email: "clerkoftheboard@countyofnapa.org",
};

pub fn supervisor_for(district: &str) -> Option<&'static Supervisor> {
    let district = district.trim();
    SUPERVISORS
        .iter()
        .find(|(id, _)| *id == district)
        .map(|(_, s)| s)
}

/// Result card for a successful lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactCard {
    pub district: String,
    pub supervisor: Supervisor,
    /// True when the district was unmapped and the clerk is shown instead.
    pub is_fallback: bool,
    pub matched_address: Option<String>,
    pub mailto: String,
    pub tel_href: String,
}

impl ContactCard {
    pub fn new(district: &str, matched_address: Option<String>, template: &EmailTemplate) -> Self {
        let district = district.trim().to_string();
        let (supervisor, is_fallback) = match supervisor_for(&district) {
            Some(s) => (*s, false),
            None => (CLERK_OF_THE_BOARD, true),
        };
        let (subject, body) = template.addressed_to(supervisor.name).subject_and_body();

        Self {
            mailto: mailto_url(supervisor.email, &subject, &body),
            tel_href: format!("tel:{}", supervisor.tel),
            matched_address: matched_address.filter(|a| !a.trim().is_empty()),
            supervisor,
            is_fallback,
            district,
        }
    }

    pub fn to_html(&self) -> String {
        let matched = self
            .matched_address
            .as_deref()
            .map(|a| {
                format!(
                    "\n    <div class=\"text-sm text-stone-400\"><i class=\"fas fa-map-marker-alt\"></i> {}</div>",
                    escape_html(a)
                )
            })
            .unwrap_or_default();

        format!(
            r#"<div class="bg-stone-900 border border-emerald-600 rounded-2xl p-6">
    <div class="text-xs uppercase tracking-widest text-emerald-400">District {district}</div>
    <div class="text-2xl font-bold text-white">{name}</div>{matched}
    <div class="flex flex-wrap gap-3 mt-4">
        <a href="{mailto}" class="bg-emerald-600 hover:bg-emerald-500 text-white px-5 py-3 rounded-xl"><i class="fas fa-envelope"></i> Email {name}</a>
        <a href="{tel}" class="bg-stone-800 hover:bg-stone-700 text-white px-5 py-3 rounded-xl"><i class="fas fa-phone"></i> {phone}</a>
    </div>
</div>"#,
            district = escape_html(&self.district),
            name = escape_html(self.supervisor.name),
            mailto = escape_html(&self.mailto),
            tel = escape_html(&self.tel_href),
            phone = escape_html(self.supervisor.phone),
        )
    }
}
