//! Equipment domain model.
//!
//! # Responsibility
//! - Define the canonical shape of one equipment line (extinguisher or hose).
//! - Validate equipment once at construction so later stages never see
//!   malformed items.
//!
//! # Invariants
//! - `quantity >= 1`.
//! - Extinguishers carry an agent and a kilogram/liter capacity.
//! - Hoses carry no agent and a meter length.
//! - An explicit expiration is never earlier than `registered_at`.

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

static MEASURE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d+)\s*([a-z]+)$").expect("valid measure regex"));

/// Equipment category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipmentKind {
    /// Portable fire extinguisher.
    Extinguisher,
    /// Fire hose.
    Hose,
}

impl EquipmentKind {
    /// Stable storage/wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Extinguisher => "extinguisher",
            Self::Hose => "hose",
        }
    }

    /// Parses the stable storage/wire name.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "extinguisher" => Some(Self::Extinguisher),
            "hose" => Some(Self::Hose),
            _ => None,
        }
    }
}

impl Display for EquipmentKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extinguishing agent carried by an extinguisher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtinguisherAgent {
    #[serde(rename = "powder_abc")]
    DryPowderAbc,
    #[serde(rename = "powder_bc")]
    DryPowderBc,
    #[serde(rename = "co2")]
    Co2,
    #[serde(rename = "water")]
    Water,
}

impl ExtinguisherAgent {
    /// All agents offered by data-entry collaborators.
    pub const ALL: [Self; 4] = [Self::DryPowderAbc, Self::DryPowderBc, Self::Co2, Self::Water];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::DryPowderAbc => "powder_abc",
            Self::DryPowderBc => "powder_bc",
            Self::Co2 => "co2",
            Self::Water => "water",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "powder_abc" => Some(Self::DryPowderAbc),
            "powder_bc" => Some(Self::DryPowderBc),
            "co2" => Some(Self::Co2),
            "water" => Some(Self::Water),
            _ => None,
        }
    }

    /// Human-readable label used in rendered documents.
    pub fn label(self) -> &'static str {
        match self {
            Self::DryPowderAbc => "Dry powder ABC",
            Self::DryPowderBc => "Dry powder BC",
            Self::Co2 => "CO2",
            Self::Water => "Water",
        }
    }
}

/// Capacity (extinguishers) or length (hoses) of one equipment line.
///
/// Serialized as compact text: `6kg`, `10L`, `15m`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Measure {
    Kilograms(u32),
    Liters(u32),
    Meters(u32),
}

/// Standard extinguisher capacities offered by data-entry collaborators.
pub const EXTINGUISHER_CAPACITIES: [Measure; 5] = [
    Measure::Kilograms(4),
    Measure::Kilograms(6),
    Measure::Kilograms(8),
    Measure::Kilograms(10),
    Measure::Liters(10),
];

/// Standard hose lengths offered by data-entry collaborators.
pub const HOSE_LENGTHS: [Measure; 4] = [
    Measure::Meters(15),
    Measure::Meters(20),
    Measure::Meters(25),
    Measure::Meters(30),
];

impl Measure {
    pub fn amount(self) -> u32 {
        match self {
            Self::Kilograms(value) | Self::Liters(value) | Self::Meters(value) => value,
        }
    }

    /// Returns whether this unit is valid for the given equipment kind.
    pub fn fits(self, kind: EquipmentKind) -> bool {
        match kind {
            EquipmentKind::Extinguisher => matches!(self, Self::Kilograms(_) | Self::Liters(_)),
            EquipmentKind::Hose => matches!(self, Self::Meters(_)),
        }
    }
}

impl Display for Measure {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Kilograms(value) => write!(f, "{value}kg"),
            Self::Liters(value) => write!(f, "{value}L"),
            Self::Meters(value) => write!(f, "{value}m"),
        }
    }
}

/// Error returned when measure text cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeasureParseError(pub String);

impl Display for MeasureParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "invalid measure `{}`; expected <n>kg, <n>L or <n>m",
            self.0
        )
    }
}

impl Error for MeasureParseError {}

impl FromStr for Measure {
    type Err = MeasureParseError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase();
        let invalid = || MeasureParseError(value.to_string());

        let caps = MEASURE_RE.captures(&normalized).ok_or_else(invalid)?;
        let amount = caps[1].parse::<u32>().map_err(|_| invalid())?;
        if amount == 0 {
            return Err(invalid());
        }

        match &caps[2] {
            "kg" => Ok(Self::Kilograms(amount)),
            "l" | "lt" | "liter" | "liters" | "litre" | "litres" | "litro" | "litros" => {
                Ok(Self::Liters(amount))
            }
            "m" | "meter" | "meters" | "metre" | "metres" | "metro" | "metros" => {
                Ok(Self::Meters(amount))
            }
            _ => Err(invalid()),
        }
    }
}

impl From<Measure> for String {
    fn from(value: Measure) -> Self {
        value.to_string()
    }
}

impl TryFrom<String> for Measure {
    type Error = MeasureParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Validation errors for equipment construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EquipmentValidationError {
    ZeroQuantity,
    ZeroMeasure(Measure),
    MeasureMismatch {
        kind: EquipmentKind,
        measure: Measure,
    },
    MissingAgent,
    UnexpectedAgent(ExtinguisherAgent),
    ExpirationBeforeRegistration {
        registered_at: NaiveDate,
        expiration: NaiveDate,
    },
}

impl Display for EquipmentValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ZeroQuantity => write!(f, "quantity must be >= 1"),
            Self::ZeroMeasure(measure) => write!(f, "measure must be positive, got {measure}"),
            Self::MeasureMismatch { kind, measure } => {
                write!(f, "measure {measure} is not valid for {kind}")
            }
            Self::MissingAgent => write!(f, "extinguisher requires an extinguishing agent"),
            Self::UnexpectedAgent(agent) => {
                write!(f, "hose must not carry an agent, got `{}`", agent.as_str())
            }
            Self::ExpirationBeforeRegistration {
                registered_at,
                expiration,
            } => write!(
                f,
                "expiration ({expiration}) must be >= registered_at ({registered_at})"
            ),
        }
    }
}

impl Error for EquipmentValidationError {}

/// Unvalidated equipment fields, also used as the serde wire shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewEquipmentItem {
    pub kind: EquipmentKind,
    #[serde(default)]
    pub agent: Option<ExtinguisherAgent>,
    pub capacity_or_length: Measure,
    pub quantity: u32,
    pub registered_at: NaiveDate,
    #[serde(default)]
    pub expiration: Option<NaiveDate>,
}

/// One validated equipment line owned by a company.
///
/// Fields are private so every instance in circulation went through
/// [`EquipmentItem::try_new`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "NewEquipmentItem", into = "NewEquipmentItem")]
pub struct EquipmentItem {
    kind: EquipmentKind,
    agent: Option<ExtinguisherAgent>,
    capacity_or_length: Measure,
    quantity: u32,
    registered_at: NaiveDate,
    expiration: Option<NaiveDate>,
}

impl EquipmentItem {
    /// Validates raw fields into an equipment item.
    pub fn try_new(raw: NewEquipmentItem) -> Result<Self, EquipmentValidationError> {
        if raw.quantity == 0 {
            return Err(EquipmentValidationError::ZeroQuantity);
        }
        if raw.capacity_or_length.amount() == 0 {
            return Err(EquipmentValidationError::ZeroMeasure(
                raw.capacity_or_length,
            ));
        }
        if !raw.capacity_or_length.fits(raw.kind) {
            return Err(EquipmentValidationError::MeasureMismatch {
                kind: raw.kind,
                measure: raw.capacity_or_length,
            });
        }
        match (raw.kind, raw.agent) {
            (EquipmentKind::Extinguisher, None) => {
                return Err(EquipmentValidationError::MissingAgent)
            }
            (EquipmentKind::Hose, Some(agent)) => {
                return Err(EquipmentValidationError::UnexpectedAgent(agent))
            }
            _ => {}
        }
        if let Some(expiration) = raw.expiration {
            if expiration < raw.registered_at {
                return Err(EquipmentValidationError::ExpirationBeforeRegistration {
                    registered_at: raw.registered_at,
                    expiration,
                });
            }
        }

        Ok(Self {
            kind: raw.kind,
            agent: raw.agent,
            capacity_or_length: raw.capacity_or_length,
            quantity: raw.quantity,
            registered_at: raw.registered_at,
            expiration: raw.expiration,
        })
    }

    /// Builds an extinguisher line without explicit expiration.
    pub fn extinguisher(
        agent: ExtinguisherAgent,
        capacity: Measure,
        quantity: u32,
        registered_at: NaiveDate,
    ) -> Result<Self, EquipmentValidationError> {
        Self::try_new(NewEquipmentItem {
            kind: EquipmentKind::Extinguisher,
            agent: Some(agent),
            capacity_or_length: capacity,
            quantity,
            registered_at,
            expiration: None,
        })
    }

    /// Builds a hose line without explicit expiration.
    pub fn hose(
        length: Measure,
        quantity: u32,
        registered_at: NaiveDate,
    ) -> Result<Self, EquipmentValidationError> {
        Self::try_new(NewEquipmentItem {
            kind: EquipmentKind::Hose,
            agent: None,
            capacity_or_length: length,
            quantity,
            registered_at,
            expiration: None,
        })
    }

    /// Returns a copy carrying an explicit expiration override.
    pub fn with_expiration(self, expiration: NaiveDate) -> Result<Self, EquipmentValidationError> {
        let mut raw = NewEquipmentItem::from(self);
        raw.expiration = Some(expiration);
        Self::try_new(raw)
    }

    pub fn kind(&self) -> EquipmentKind {
        self.kind
    }

    pub fn agent(&self) -> Option<ExtinguisherAgent> {
        self.agent
    }

    pub fn capacity_or_length(&self) -> Measure {
        self.capacity_or_length
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    pub fn registered_at(&self) -> NaiveDate {
        self.registered_at
    }

    /// Explicit expiration override, if one was recorded.
    ///
    /// Use [`crate::report::expiration::expiration_of`] for the effective date.
    pub fn explicit_expiration(&self) -> Option<NaiveDate> {
        self.expiration
    }
}

impl From<EquipmentItem> for NewEquipmentItem {
    fn from(value: EquipmentItem) -> Self {
        Self {
            kind: value.kind,
            agent: value.agent,
            capacity_or_length: value.capacity_or_length,
            quantity: value.quantity,
            registered_at: value.registered_at,
            expiration: value.expiration,
        }
    }
}

impl TryFrom<NewEquipmentItem> for EquipmentItem {
    type Error = EquipmentValidationError;

    fn try_from(value: NewEquipmentItem) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}
