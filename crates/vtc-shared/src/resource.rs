//! Backend collections the dashboard lists and edits

use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::{
    const_config::path::PathSpec,
    id::DbId,
    uac::{OwnedResource, RawPartnerRef, ResourceOwner},
};

#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    serde::Serialize,
    serde::Deserialize,
    strum::Display,
    strum::EnumIter,
    strum::AsRefStr,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ResourceKind {
    Drivers,
    Partners,
    Agents,
    Evaluations,
    EvaluationCriteria,
    EvaluationTemplates,
    Roles,
    Permissions,
    Sessions,
}

/// Guard names needed for each kind of operation on a collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourcePermissions {
    pub view: &'static str,
    pub create: &'static str,
    pub update: &'static str,
    pub delete: &'static str,
}

macro_rules! resource_permissions {
    ($suffix:literal) => {
        ResourcePermissions {
            view: concat!("view_", $suffix),
            create: concat!("create_", $suffix),
            update: concat!("update_", $suffix),
            delete: concat!("delete_", $suffix),
        }
    };
}

impl ResourceKind {
    /// Path of the collection relative to the API base URL
    pub fn collection_path(&self) -> &'static str {
        match self {
            ResourceKind::Drivers => "/drivers",
            ResourceKind::Partners => "/partners",
            ResourceKind::Agents => "/agents",
            ResourceKind::Evaluations => "/evaluations",
            ResourceKind::EvaluationCriteria => "/evaluation-criteria",
            ResourceKind::EvaluationTemplates => "/evaluation-templates",
            ResourceKind::Roles => "/roles",
            ResourceKind::Permissions => "/permissions",
            ResourceKind::Sessions => "/sessions",
        }
    }

    pub fn permissions(&self) -> ResourcePermissions {
        match self {
            ResourceKind::Drivers => resource_permissions!("drivers"),
            ResourceKind::Partners => resource_permissions!("partners"),
            ResourceKind::Agents => resource_permissions!("agents"),
            ResourceKind::Evaluations => resource_permissions!("evaluations"),
            ResourceKind::EvaluationCriteria => resource_permissions!("evaluation_criteria"),
            ResourceKind::EvaluationTemplates => resource_permissions!("evaluation_templates"),
            ResourceKind::Roles => resource_permissions!("roles"),
            ResourceKind::Permissions => resource_permissions!("permissions"),
            ResourceKind::Sessions => resource_permissions!("sessions"),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            ResourceKind::Drivers => "Drivers",
            ResourceKind::Partners => "Partners",
            ResourceKind::Agents => "Agents",
            ResourceKind::Evaluations => "Evaluations",
            ResourceKind::EvaluationCriteria => "Evaluation Criteria",
            ResourceKind::EvaluationTemplates => "Evaluation Templates",
            ResourceKind::Roles => "Roles",
            ResourceKind::Permissions => "Permissions",
            ResourceKind::Sessions => "Sessions",
        }
    }

    /// Fields shown as columns on the list page as (key, header)
    pub fn columns(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            ResourceKind::Drivers | ResourceKind::Agents => &[
                ("first_name", "First Name"),
                ("last_name", "Last Name"),
                ("email", "Email"),
                ("phone", "Phone"),
            ],
            ResourceKind::Partners => &[("name", "Name"), ("email", "Email"), ("phone", "Phone")],
            ResourceKind::Evaluations => &[
                ("title", "Title"),
                ("status", "Status"),
                ("score", "Score"),
            ],
            ResourceKind::EvaluationCriteria | ResourceKind::EvaluationTemplates => {
                &[("name", "Name"), ("description", "Description")]
            }
            ResourceKind::Roles => &[("name", "Name"), ("is_active", "Active")],
            ResourceKind::Permissions => &[("name", "Name"), ("guard_name", "Guard Name")],
            ResourceKind::Sessions => &[
                ("ip_address", "IP Address"),
                ("user_agent", "User Agent"),
                ("last_activity", "Last Activity"),
            ],
        }
    }

    pub fn list_spec(&self) -> PathSpec {
        PathSpec::get(self.collection_path())
    }

    pub fn create_spec(&self) -> PathSpec {
        PathSpec::post(self.collection_path())
    }

    pub fn get_spec(&self, id: DbId) -> PathSpec {
        self.item_spec(Method::GET, id)
    }

    pub fn update_spec(&self, id: DbId) -> PathSpec {
        self.item_spec(Method::PUT, id)
    }

    pub fn delete_spec(&self, id: DbId) -> PathSpec {
        self.item_spec(Method::DELETE, id)
    }

    fn item_spec(&self, method: Method, id: DbId) -> PathSpec {
        PathSpec::dynamic(method, format!("{}/{id}", self.collection_path()))
    }
}

/// One page of a collection
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(bound(deserialize = "T: DeserializeOwned"))]
pub struct Paginated<T> {
    #[serde(default = "Vec::new", alias = "data", alias = "content")]
    pub items: Vec<T>,
    #[serde(default, alias = "totalElements", alias = "total_elements")]
    pub total: u64,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default, alias = "perPage")]
    pub per_page: u32,
}

fn first_page() -> u32 {
    1
}

/// Some list endpoints answer with a bare array instead of a page
#[derive(Debug, serde::Deserialize, Clone, PartialEq)]
#[serde(untagged, bound(deserialize = "T: DeserializeOwned"))]
pub enum PageOrList<T> {
    Page(Paginated<T>),
    List(Vec<T>),
}

impl<T> From<PageOrList<T>> for Paginated<T> {
    fn from(value: PageOrList<T>) -> Self {
        match value {
            PageOrList::Page(page) => page,
            PageOrList::List(items) => Self {
                total: items.len() as u64,
                per_page: items.len() as u32,
                page: 1,
                items,
            },
        }
    }
}

impl<T> Paginated<T> {
    /// Number of pages needed to show every item, at least 1
    pub fn page_count(&self) -> u32 {
        if self.per_page == 0 || self.total == 0 {
            return 1;
        }
        self.total.div_ceil(self.per_page as u64) as u32
    }

    pub fn has_next(&self) -> bool {
        self.page < self.page_count()
    }

    pub fn has_previous(&self) -> bool {
        self.page > 1
    }
}

/// A record of any collection, kept as loose JSON for generic display
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq, Default)]
#[serde(transparent)]
pub struct ResourceRecord(pub serde_json::Map<String, serde_json::Value>);

impl ResourceRecord {
    pub fn id(&self) -> Option<DbId> {
        self.0
            .get("id")
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Text for a table cell, empty if the field is missing or null
    pub fn display_field(&self, key: &str) -> String {
        match self.0.get(key) {
            None | Some(serde_json::Value::Null) => String::new(),
            Some(serde_json::Value::String(s)) => s.clone(),
            Some(serde_json::Value::Bool(b)) => if *b { "Yes" } else { "No" }.to_string(),
            Some(other) => other.to_string(),
        }
    }
}

/// Agent as returned by `/agents/{id}`
#[derive(Debug, Default, serde::Serialize, serde::Deserialize, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct AgentSummary {
    pub id: Option<DbId>,
    #[serde(alias = "firstName")]
    pub first_name: Option<String>,
    #[serde(alias = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(alias = "phoneNumber")]
    pub phone: Option<String>,
    #[serde(alias = "userId")]
    pub user_id: Option<DbId>,
    #[serde(alias = "partnerId")]
    pub partner_id: Option<DbId>,
    pub partner: Option<RawPartnerRef>,
}

impl AgentSummary {
    pub fn display_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        if name.trim().is_empty() {
            self.email.clone().unwrap_or_else(|| "Unnamed agent".to_string())
        } else {
            name
        }
    }
}

impl OwnedResource for AgentSummary {
    fn owner(&self) -> ResourceOwner {
        ResourceOwner {
            user_id: self.user_id,
            partner_id: self
                .partner_id
                .or_else(|| self.partner.as_ref().and_then(|partner| partner.id)),
        }
    }
}
