use std::collections::BTreeMap;

use serde::Serialize;

/// Type name registered by the provider.
pub const PROVIDER_TYPE_NAME: &str = "authress";

/// Type name of the role resource.
pub const ROLE_RESOURCE_TYPE: &str = "authress_role";

/// Value type of one schema attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AttributeType {
    /// UTF-8 string.
    String,
    /// Boolean flag.
    Bool,
    /// Map from string keys to nested objects.
    MapNested {
        /// Attributes of every map element.
        attributes: BTreeMap<&'static str, Attribute>,
    },
}

/// Declaration of one attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Attribute {
    /// Value type.
    #[serde(flatten)]
    pub attribute_type: AttributeType,
    /// Operator-facing description.
    pub description: &'static str,
    /// Must be set in configuration.
    pub required: bool,
    /// May be set in configuration.
    pub optional: bool,
    /// May be filled in by the provider.
    pub computed: bool,
    /// Hidden from plan output.
    pub sensitive: bool,
    /// A change destroys and recreates the resource.
    pub requires_replace: bool,
    /// Human readable validation rules.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub constraints: Vec<&'static str>,
}

impl Attribute {
    fn new(attribute_type: AttributeType, description: &'static str) -> Self {
        Self {
            attribute_type,
            description,
            required: false,
            optional: false,
            computed: false,
            sensitive: false,
            requires_replace: false,
            constraints: Vec::new(),
        }
    }

    /// Declares a required attribute.
    #[must_use]
    pub fn required(attribute_type: AttributeType, description: &'static str) -> Self {
        Self {
            required: true,
            ..Self::new(attribute_type, description)
        }
    }

    /// Declares an optional attribute.
    #[must_use]
    pub fn optional(attribute_type: AttributeType, description: &'static str) -> Self {
        Self {
            optional: true,
            ..Self::new(attribute_type, description)
        }
    }

    /// Declares a provider-computed attribute.
    #[must_use]
    pub fn computed(attribute_type: AttributeType, description: &'static str) -> Self {
        Self {
            computed: true,
            ..Self::new(attribute_type, description)
        }
    }

    /// Lets the provider fill the value when configuration leaves it unset.
    #[must_use]
    pub fn with_computed(mut self) -> Self {
        self.computed = true;
        self
    }

    /// Marks the attribute as sensitive.
    #[must_use]
    pub fn with_sensitive(mut self) -> Self {
        self.sensitive = true;
        self
    }

    /// Forces replacement when the value changes.
    #[must_use]
    pub fn with_requires_replace(mut self) -> Self {
        self.requires_replace = true;
        self
    }

    /// Documents one validation rule.
    #[must_use]
    pub fn with_constraint(mut self, constraint: &'static str) -> Self {
        self.constraints.push(constraint);
        self
    }
}

/// Schema of the provider block or of one resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Schema {
    /// Schema version used for state upgrades.
    pub version: u32,
    /// Plain-text description.
    pub description: &'static str,
    /// Markdown description, when it differs from the plain one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub markdown_description: Option<&'static str>,
    /// Attributes keyed by name.
    pub attributes: BTreeMap<&'static str, Attribute>,
}

/// Every schema the provider exposes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderSchema {
    /// Provider block schema.
    pub provider: Schema,
    /// Resource schemas keyed by type name.
    pub resource_schemas: BTreeMap<&'static str, Schema>,
}

/// Returns the full provider schema.
#[must_use]
pub fn provider_schema() -> ProviderSchema {
    ProviderSchema {
        provider: provider_block_schema(),
        resource_schemas: BTreeMap::from([(ROLE_RESOURCE_TYPE, role_schema())]),
    }
}

/// Returns the provider block schema.
#[must_use]
pub fn provider_block_schema() -> Schema {
    Schema {
        version: 0,
        description: "Deploy resources to your Authress account.",
        markdown_description: None,
        attributes: BTreeMap::from([
            (
                "custom_domain",
                Attribute::required(
                    AttributeType::String,
                    "Your Authress custom domain. [Configure a custom domain for Authress account](https://authress.io/app/#/settings?focus=domain) or use the [provided domain](https://authress.io/app/#/api?route=overview).",
                ),
            ),
            (
                "access_key",
                Attribute::optional(
                    AttributeType::String,
                    "The access key for the Authress API. Should be [configured by your CI/CD](https://authress.io/knowledge-base/docs/category/cicd) automatically.",
                )
                .with_sensitive(),
            ),
        ]),
    }
}

/// Returns the `authress_role` resource schema.
#[must_use]
pub fn role_schema() -> Schema {
    let permission_attributes = BTreeMap::from([
        (
            "allow",
            Attribute::required(
                AttributeType::Bool,
                "Does this permission grant the user the ability to execute the action?",
            ),
        ),
        (
            "grant",
            Attribute::optional(
                AttributeType::Bool,
                "Allows the user to give the permission to others without being able to execute the action.",
            )
            .with_computed()
            .with_constraint("defaults to false"),
        ),
        (
            "delegate",
            Attribute::optional(
                AttributeType::Bool,
                "Allows delegating or granting the permission to others without being able to execute the action.",
            )
            .with_computed()
            .with_constraint("defaults to false"),
        ),
    ]);

    Schema {
        version: 0,
        description: "Manages an Authress `Role`. Roles are assigned to `Users` for specific `Resources` using an `Access Record`. `Roles` only contain a list of permissions and should be mapped to your existing User Personas. See Authress KB for more information.",
        markdown_description: Some(
            "Manages an Authress `Role`. Roles are assigned to `Users` for specific `Resources` using an `Access Record`. `Roles` only contain a list of permissions and should be mapped to your existing User Personas. See [Roles and Permissions](https://authress.io/knowledge-base/docs/authorization/permissions#roles) for more information.",
        ),
        attributes: BTreeMap::from([
            (
                "id",
                Attribute::computed(
                    AttributeType::String,
                    "Legacy Terraform property mirroring role_id.",
                ),
            ),
            (
                "role_id",
                Attribute::required(
                    AttributeType::String,
                    "Unique identifier for the role, can be specified on creation, and used by records to map to permissions.",
                )
                .with_requires_replace()
                .with_constraint("length between 1 and 64")
                .with_constraint("must contain only alphanumeric characters and [-._:@]"),
            ),
            (
                "name",
                Attribute::required(
                    AttributeType::String,
                    "A helpful name for this role. The name displays in the Authress Management Portal",
                )
                .with_constraint("length between 1 and 128"),
            ),
            (
                "description",
                Attribute::optional(
                    AttributeType::String,
                    "An extended description field that can be used to store additional information about the usage of the role.",
                )
                .with_computed()
                .with_constraint("length at most 1024"),
            ),
            (
                "last_updated",
                Attribute::computed(
                    AttributeType::String,
                    "Timestamp of the last Terraform update of the role.",
                ),
            ),
            (
                "permissions",
                Attribute::required(
                    AttributeType::MapNested {
                        attributes: permission_attributes,
                    },
                    "A map of the permissions. The key of the map is the action the permission grants, can be scoped using `:` and parent actions imply sub-resource permissions, `action:*` or `action` implies `action:sub-action`. This property is case-insensitive, it will always be cast to lowercase before comparing actions to user permissions.",
                )
                .with_constraint("keys have length between 1 and 64")
                .with_constraint("keys must contain only alphanumeric characters and colons used as namespace separators"),
            ),
        ]),
    }
}
