//! Coded-value enum mappings between symbolic members and wire tokens.

use crate::error::{InternalMappingError, MappingDefinitionError};
use crate::value::Symbol;
use geobind_rs_protocol::WireValue;
use std::collections::HashMap;
use std::sync::Arc;

/// Token used by boolean-flag mappings for the set state.
pub const TRUE_TOKEN: &str = "true";
/// Token used by boolean-flag mappings for the cleared state.
pub const FALSE_TOKEN: &str = "false";

/// One (symbol, wire token, display label) triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumEntry {
    pub symbol: String,
    pub token: String,
    pub label: String,
}

impl EnumEntry {
    pub fn new(symbol: impl Into<String>, token: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            token: token.into(),
            label: label.into(),
        }
    }
}

/// Closed bijection between symbols and wire tokens.
#[derive(Debug, Clone)]
pub struct EnumMapping {
    name: String,
    entries: Vec<EnumEntry>,
    by_symbol: HashMap<String, usize>,
    by_token: HashMap<String, usize>,
}

impl EnumMapping {
    /// Build a mapping, failing on duplicate tokens or symbols.
    pub fn new(
        name: impl Into<String>,
        entries: impl IntoIterator<Item = EnumEntry>,
    ) -> Result<Self, MappingDefinitionError> {
        let name = name.into();
        let entries = entries.into_iter().collect::<Vec<_>>();
        if entries.is_empty() {
            return Err(MappingDefinitionError::Empty { mapping: name });
        }
        let mut by_symbol = HashMap::with_capacity(entries.len());
        let mut by_token = HashMap::with_capacity(entries.len());
        for (idx, entry) in entries.iter().enumerate() {
            if by_symbol.insert(entry.symbol.clone(), idx).is_some() {
                return Err(MappingDefinitionError::DuplicateSymbol {
                    mapping: name,
                    symbol: entry.symbol.clone(),
                });
            }
            if by_token.insert(entry.token.clone(), idx).is_some() {
                return Err(MappingDefinitionError::DuplicateToken {
                    mapping: name,
                    token: entry.token.clone(),
                });
            }
        }
        Ok(Self {
            name,
            entries,
            by_symbol,
            by_token,
        })
    }

    /// Two-entry mapping for boolean-flag parameters.
    ///
    /// Members are `True` and `False`; tokens are `"true"` and `"false"`.
    pub fn boolean(
        name: impl Into<String>,
        true_label: impl Into<String>,
        false_label: impl Into<String>,
    ) -> Result<Self, MappingDefinitionError> {
        Self::new(
            name,
            [
                EnumEntry::new("True", TRUE_TOKEN, true_label),
                EnumEntry::new("False", FALSE_TOKEN, false_label),
            ],
        )
    }

    /// Mapping name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Entries in declaration order.
    pub fn entries(&self) -> &[EnumEntry] {
        &self.entries
    }

    /// Map a member name to its wire token.
    pub fn to_wire(&self, member: &str) -> Result<&str, InternalMappingError> {
        self.by_symbol
            .get(member)
            .map(|idx| self.entries[*idx].token.as_str())
            .ok_or_else(|| InternalMappingError {
                mapping: self.name.clone(),
                symbol: member.to_string(),
            })
    }

    /// Map a symbol to its wire token, checking it belongs to this mapping.
    pub fn symbol_to_wire(&self, symbol: Symbol) -> Result<&str, InternalMappingError> {
        if symbol.mapping != self.name {
            return Err(InternalMappingError {
                mapping: self.name.clone(),
                symbol: symbol.to_string(),
            });
        }
        self.to_wire(symbol.member)
    }

    /// Map a wire token back to its member name.
    pub fn from_wire(&self, token: &str) -> Option<&str> {
        self.by_token
            .get(token)
            .map(|idx| self.entries[*idx].symbol.as_str())
    }

    /// Display label for a member.
    pub fn label(&self, member: &str) -> Option<&str> {
        self.by_symbol
            .get(member)
            .map(|idx| self.entries[*idx].label.as_str())
    }

    pub fn contains_token(&self, token: &str) -> bool {
        self.by_token.contains_key(token)
    }

    pub fn contains_symbol(&self, member: &str) -> bool {
        self.by_symbol.contains_key(member)
    }

    /// Whether the tokens are exactly `"true"` and `"false"`.
    pub fn is_boolean(&self) -> bool {
        self.entries.len() == 2 && self.contains_token(TRUE_TOKEN) && self.contains_token(FALSE_TOKEN)
    }

    /// Encode a token in the shape the engine expects.
    ///
    /// Boolean-flag mappings travel as booleans, all others as strings.
    pub fn encode_token(&self, token: &str) -> WireValue {
        if self.is_boolean() {
            WireValue::Bool(token == TRUE_TOKEN)
        } else {
            WireValue::String(token.to_string())
        }
    }
}

/// Typed Rust enum backed by an `EnumMapping`.
///
/// Implementations are normally produced by [`coded_enum!`](crate::coded_enum).
pub trait CodedEnum: Copy + Sized + 'static {
    /// Name shared by the enum's symbols and mapping.
    const MAPPING_NAME: &'static str;

    /// Shared mapping, built once on first use.
    fn mapping() -> Result<Arc<EnumMapping>, MappingDefinitionError>;

    /// Member name of this variant.
    fn member(self) -> &'static str;

    /// Variant for a member name.
    fn from_member(member: &str) -> Option<Self>;

    /// Symbol for this variant.
    fn symbol(self) -> Symbol {
        Symbol::new(Self::MAPPING_NAME, self.member())
    }

    /// Wire token for this variant.
    fn to_wire(self) -> Result<String, InternalMappingError> {
        let mapping = Self::mapping().map_err(|_| InternalMappingError {
            mapping: Self::MAPPING_NAME.to_string(),
            symbol: self.member().to_string(),
        })?;
        mapping.to_wire(self.member()).map(str::to_string)
    }

    /// Variant for a wire token.
    fn from_wire(token: &str) -> Option<Self> {
        let mapping = Self::mapping().ok()?;
        mapping.from_wire(token).and_then(Self::from_member)
    }
}

/// Declare a typed coded-value enum together with its wire mapping.
///
/// ```
/// geobind_rs_tools::coded_enum! {
///     /// Travel direction relative to facilities.
///     pub enum TravelDirection: "TravelDirection" {
///         ToFacilities => ("TRAVEL_TO", "Toward facilities"),
///         FromFacilities => ("TRAVEL_FROM", "Away from facilities"),
///     }
/// }
/// use geobind_rs_tools::CodedEnum;
/// assert_eq!(TravelDirection::ToFacilities.to_wire().unwrap(), "TRAVEL_TO");
/// ```
#[macro_export]
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident : $mapping:literal {
            $($variant:ident => ($token:literal, $label:literal)),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        $vis enum $name {
            $($variant),+
        }

        impl $name {
            /// All variants in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
        }

        impl $crate::CodedEnum for $name {
            const MAPPING_NAME: &'static str = $mapping;

            fn mapping() -> ::std::result::Result<
                ::std::sync::Arc<$crate::EnumMapping>,
                $crate::MappingDefinitionError,
            > {
                static MAPPING: ::std::sync::OnceLock<
                    ::std::result::Result<
                        ::std::sync::Arc<$crate::EnumMapping>,
                        $crate::MappingDefinitionError,
                    >,
                > = ::std::sync::OnceLock::new();
                MAPPING
                    .get_or_init(|| {
                        $crate::EnumMapping::new(
                            $mapping,
                            [$($crate::EnumEntry::new(stringify!($variant), $token, $label)),+],
                        )
                        .map(::std::sync::Arc::new)
                    })
                    .clone()
            }

            fn member(self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }

            fn from_member(member: &str) -> ::std::option::Option<Self> {
                match member {
                    $(stringify!($variant) => ::std::option::Option::Some($name::$variant),)+
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl ::std::convert::From<$name> for $crate::ParamValue {
            fn from(value: $name) -> Self {
                $crate::ParamValue::from($crate::CodedEnum::symbol(value))
            }
        }
    };
}
