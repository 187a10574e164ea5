//! Static attribute declarations for the `gdrive_file` resource and data
//! source, and validation of declared configuration against them.

use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::error::{DriveError, Result};
use crate::models::ItemType;

/// Value kind of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    String,
    StringList,
}

/// Who provides the value of an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Presence {
    Required,
    Optional,
    Computed,
}

#[derive(Debug, Clone, Serialize)]
pub struct Attribute {
    pub name: &'static str,
    pub kind: AttributeKind,
    pub presence: Presence,
    /// A change to this attribute requires destroy-and-recreate.
    pub force_new: bool,
    #[serde(skip_serializing_if = "no_values")]
    pub conflicts_with: &'static [&'static str],
    #[serde(skip_serializing_if = "no_values")]
    pub one_of: &'static [&'static str],
    pub description: &'static str,
}

fn no_values(values: &&'static [&'static str]) -> bool {
    values.is_empty()
}

impl Attribute {
    const fn new(name: &'static str, kind: AttributeKind) -> Self {
        Self {
            name,
            kind,
            presence: Presence::Computed,
            force_new: false,
            conflicts_with: &[],
            one_of: &[],
            description: "",
        }
    }

    pub const fn string(name: &'static str) -> Self {
        Self::new(name, AttributeKind::String)
    }

    pub const fn string_list(name: &'static str) -> Self {
        Self::new(name, AttributeKind::StringList)
    }

    pub const fn required(mut self) -> Self {
        self.presence = Presence::Required;
        self
    }

    pub const fn optional(mut self) -> Self {
        self.presence = Presence::Optional;
        self
    }

    pub const fn force_new(mut self) -> Self {
        self.force_new = true;
        self
    }

    pub const fn conflicts_with(mut self, names: &'static [&'static str]) -> Self {
        self.conflicts_with = names;
        self
    }

    pub const fn one_of(mut self, values: &'static [&'static str]) -> Self {
        self.one_of = values;
        self
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn is_computed(&self) -> bool {
        self.presence == Presence::Computed
    }

    fn check_kind(&self, value: &Value) -> Option<String> {
        let ok = match self.kind {
            AttributeKind::String => value.is_string(),
            AttributeKind::StringList => value
                .as_array()
                .is_some_and(|items| items.iter().all(Value::is_string)),
        };
        if ok {
            return None;
        }
        let expected = match self.kind {
            AttributeKind::String => "string",
            AttributeKind::StringList => "list of string",
        };
        Some(format!("{:?}: expected {}", self.name, expected))
    }

    fn check_one_of(&self, value: &Value) -> Option<String> {
        let got = value.as_str()?;
        if self.one_of.is_empty() || self.one_of.iter().any(|v| *v == got) {
            return None;
        }
        let allowed: Vec<String> = self.one_of.iter().map(|v| format!("{:?}", v)).collect();
        Some(format!(
            "{:?} must be any one of [{}], got: {:?}",
            self.name,
            allowed.join(" "),
            got
        ))
    }
}

/// Attribute set of one resource or data source.
#[derive(Debug, Serialize)]
pub struct Schema {
    pub description: &'static str,
    pub attributes: &'static [Attribute],
}

impl Schema {
    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// ForceNew attributes, in declaration order.
    pub fn force_new_attributes(&self) -> impl Iterator<Item = &Attribute> {
        self.attributes.iter().filter(|a| a.force_new)
    }

    /// Check a declared configuration object. `null` counts as unset.
    ///
    /// Every problem found is reported in a single validation error.
    pub fn validate(&self, config: &Value) -> Result<()> {
        let Some(object) = config.as_object() else {
            return Err(DriveError::validation("configuration must be an object"));
        };

        let mut errors = Vec::new();
        let set = |name: &str| object.get(name).is_some_and(|v| !v.is_null());

        for (name, value) in object.iter().filter(|(_, v)| !v.is_null()) {
            let Some(attribute) = self.attribute(name) else {
                errors.push(format!("An argument named {:?} is not expected here", name));
                continue;
            };
            if attribute.is_computed() {
                errors.push(format!("{:?}: this field cannot be set", name));
                continue;
            }
            if let Some(err) = attribute.check_kind(value) {
                errors.push(err);
                continue;
            }
            errors.extend(attribute.check_one_of(value));
            for other in attribute.conflicts_with.iter().filter(|other| set(**other)) {
                errors.push(format!("{:?}: conflicts with {}", name, other));
            }
        }

        for attribute in self.attributes.iter() {
            if attribute.presence == Presence::Required && !set(attribute.name) {
                errors.push(format!(
                    "The argument {:?} is required, but no definition was found",
                    attribute.name
                ));
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(DriveError::ValidationError(errors.join("; ")))
        }
    }
}

const ID_DESCRIPTION: &str = "The ID of the file, folder or shortcut.
ID is found on url as follow:
https://drive.google.com/file/d/{ID}
https://drive.google.com/drive/u/0/folders/{ID}";

const TYPE_DESCRIPTION: &str = "The type of google drive system files.
folder: google drive folder
shortcut: google drive shortcut";

const MD5_DESCRIPTION: &str = "The MD5 checksum for the content of the file.
This is only applicable to files with binary content in Google Drive.";

/// Schema of the `gdrive_file` resource.
pub static FILE_RESOURCE: Schema = Schema {
    description: "Creates a new file, folder or shortcut inside an existing google drive.",
    attributes: &[
        Attribute::string("source")
            .optional()
            .force_new()
            .conflicts_with(&["type", "target_id"])
            .describe("The file source path."),
        Attribute::string("id").describe(ID_DESCRIPTION),
        Attribute::string("real_id").describe(
            "The ID of the file, folder or shortcut.
This is same value as `id` and created for compatibility with data source.",
        ),
        Attribute::string("name")
            .optional()
            .force_new()
            .describe("The name of the file, folder or shortcut."),
        Attribute::string("target_id")
            .optional()
            .force_new()
            .conflicts_with(&["source"])
            .describe("The ID of shortcut target of the the file or folder."),
        Attribute::string("drive_id")
            .optional()
            .force_new()
            .describe("The ID of the shared drive the file resides in."),
        Attribute::string("md5_checksum").describe(MD5_DESCRIPTION),
        Attribute::string("md5_checksum_for_diff")
            .optional()
            .force_new()
            .describe("For finding file source diff. Please do not set value."),
        Attribute::string("mime_type").describe("The MIME type of the file, folder or shortcut."),
        Attribute::string("type")
            .optional()
            .force_new()
            .conflicts_with(&["source"])
            .one_of(ItemType::NAMES)
            .describe(TYPE_DESCRIPTION),
        Attribute::string_list("parents")
            .optional()
            .force_new()
            .describe("The IDs of the parent folders which contain the file, folder or shortcut."),
        Attribute::string_list("real_parents").describe(
            "The IDs of the parent folders which contain the file, folder or shortcut.
This value is got from API and may differ from `parents`.",
        ),
    ],
};

/// Schema of the `gdrive_file` data source.
pub static FILE_DATA_SOURCE: Schema = Schema {
    description: "Gets an existing file, folder or shortcut inside an google drive.",
    attributes: &[
        Attribute::string("id").required().describe(ID_DESCRIPTION),
        Attribute::string("real_id").describe(
            "The ID of the file, folder or shortcut.
This value is got from API and may differ from `id`.",
        ),
        Attribute::string("name").describe("The name of the file, folder or shortcut."),
        Attribute::string("target_id").describe("The ID of shortcut target of the the file or folder."),
        Attribute::string("drive_id").describe("The ID of the shared drive the file resides in."),
        Attribute::string("md5_checksum").describe(MD5_DESCRIPTION),
        Attribute::string("mime_type").describe("The MIME type of the file, folder or shortcut."),
        Attribute::string("type").describe(TYPE_DESCRIPTION),
        Attribute::string_list("parents")
            .describe("The IDs of the parent folders which contain the file, folder or shortcut."),
        Attribute::string_list("real_parents").describe(
            "The IDs of the parent folders which contain the file, folder or shortcut.
This is same value as `parents` and created for compatibility with resource.",
        ),
    ],
};

/// Type name under which both schemas are registered.
pub const FILE_TYPE_NAME: &str = "gdrive_file";

/// Every schema the provider registers, keyed by kind and type name.
pub fn provider_schemas() -> Value {
    let mut resources = Map::new();
    resources.insert(FILE_TYPE_NAME.to_string(), json!(&FILE_RESOURCE));
    let mut data_sources = Map::new();
    data_sources.insert(FILE_TYPE_NAME.to_string(), json!(&FILE_DATA_SOURCE));

    json!({
        "resource_schemas": resources,
        "data_source_schemas": data_sources,
    })
}
