//! Known search fields.
//!
//! Each field is a `const` [`FieldDescriptor`]; adding a field is one line.

use super::FieldDescriptor;

/// File event search fields.
pub mod file_event {
    use super::FieldDescriptor;

    pub const FILE_PATH: FieldDescriptor = FieldDescriptor::string("filePath");
    pub const FILE_NAME: FieldDescriptor = FieldDescriptor::string("fileName");
    pub const FILE_CATEGORY: FieldDescriptor = FieldDescriptor::string("fileCategory");
    pub const FILE_OWNER: FieldDescriptor = FieldDescriptor::string("fileOwner");
    pub const FILE_SIZE: FieldDescriptor = FieldDescriptor::numeric("fileSize");
    pub const MD5: FieldDescriptor = FieldDescriptor::string("md5Checksum");
    pub const SHA256: FieldDescriptor = FieldDescriptor::string("sha256Checksum");
    pub const DEVICE_USERNAME: FieldDescriptor = FieldDescriptor::string("deviceUserName");
    pub const OS_HOSTNAME: FieldDescriptor = FieldDescriptor::string("osHostName");
    pub const PRIVATE_IP: FieldDescriptor = FieldDescriptor::string("privateIpAddresses");
    pub const PUBLIC_IP: FieldDescriptor = FieldDescriptor::string("publicIpAddress");
    pub const EVENT_TYPE: FieldDescriptor = FieldDescriptor::string("eventType");
    pub const EVENT_TIMESTAMP: FieldDescriptor = FieldDescriptor::timestamp("eventTimestamp");
    pub const INSERTION_TIMESTAMP: FieldDescriptor = FieldDescriptor::timestamp("insertionTimestamp");
    pub const EXPOSURE: FieldDescriptor = FieldDescriptor::string("exposure");
    pub const ACTOR: FieldDescriptor = FieldDescriptor::string("actor");
    pub const PROCESS_NAME: FieldDescriptor = FieldDescriptor::string("processName");
    pub const TAB_URL: FieldDescriptor = FieldDescriptor::string("tabUrl");
    pub const TRUSTED: FieldDescriptor = FieldDescriptor::boolean("trusted");
    pub const OUTSIDE_ACTIVE_HOURS: FieldDescriptor = FieldDescriptor::boolean("outsideActiveHours");
    pub const RISK_SCORE: FieldDescriptor = FieldDescriptor::numeric("riskScore");
    pub const RISK_SEVERITY: FieldDescriptor = FieldDescriptor::string("riskSeverity");

    pub const ALL: &[FieldDescriptor] = &[
        FILE_PATH,
        FILE_NAME,
        FILE_CATEGORY,
        FILE_OWNER,
        FILE_SIZE,
        MD5,
        SHA256,
        DEVICE_USERNAME,
        OS_HOSTNAME,
        PRIVATE_IP,
        PUBLIC_IP,
        EVENT_TYPE,
        EVENT_TIMESTAMP,
        INSERTION_TIMESTAMP,
        EXPOSURE,
        ACTOR,
        PROCESS_NAME,
        TAB_URL,
        TRUSTED,
        OUTSIDE_ACTIVE_HOURS,
        RISK_SCORE,
        RISK_SEVERITY,
    ];
}

/// Alert search fields.
pub mod alert {
    use super::FieldDescriptor;

    pub const ALERT_STATE: FieldDescriptor = FieldDescriptor::string("state");
    pub const SEVERITY: FieldDescriptor = FieldDescriptor::string("severity");
    pub const ACTOR: FieldDescriptor = FieldDescriptor::string("actor");
    pub const RULE_NAME: FieldDescriptor = FieldDescriptor::string("name");
    pub const RULE_ID: FieldDescriptor = FieldDescriptor::string("ruleId");
    pub const RULE_TYPE: FieldDescriptor = FieldDescriptor::string("type");
    pub const DESCRIPTION: FieldDescriptor = FieldDescriptor::string("description");
    pub const CREATED_AT: FieldDescriptor = FieldDescriptor::timestamp("createdAt");

    pub const ALL: &[FieldDescriptor] = &[
        ALERT_STATE,
        SEVERITY,
        ACTOR,
        RULE_NAME,
        RULE_ID,
        RULE_TYPE,
        DESCRIPTION,
        CREATED_AT,
    ];
}

/// Which catalog a field belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Catalog {
    FileEvent,
    Alert,
}

impl Catalog {
    pub fn fields(&self) -> &'static [FieldDescriptor] {
        match self {
            Catalog::FileEvent => file_event::ALL,
            Catalog::Alert => alert::ALL,
        }
    }

    /// Find a field in this catalog by term (case-insensitive).
    pub fn lookup(&self, term: &str) -> Option<FieldDescriptor> {
        self.fields()
            .iter()
            .find(|f| f.term().eq_ignore_ascii_case(term))
            .copied()
    }
}

impl std::str::FromStr for Catalog {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.to_lowercase().replace('_', "-").as_str() {
            "file-event" | "file-events" => Ok(Catalog::FileEvent),
            "alert" | "alerts" => Ok(Catalog::Alert),
            other => Err(crate::Error::validation(format!(
                "unknown field catalog '{}': expected file-event or alert",
                other
            ))),
        }
    }
}

/// Find a field by term, file events first, then alerts.
pub fn lookup(term: &str) -> Option<FieldDescriptor> {
    Catalog::FileEvent
        .lookup(term)
        .or_else(|| Catalog::Alert.lookup(term))
}
