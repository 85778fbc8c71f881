//! Closed value sets describing a measurement point.
//!
//! These are pure data. Coercion in [`crate::measurement`] switches on
//! [`PhysicalQuantity`] exhaustively, so a new quantity or unit means
//! extending the set here. Units and prefixes are descriptive only: nothing
//! in this crate converts between them.
//!
//! Every set parses from its canonical variant name (case-sensitive), which is
//! also what serde reads and writes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ParseEnumError;

macro_rules! closed_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            /// Every member of the set, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Canonical name, as accepted by `FromStr`.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => stringify!($variant)),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $(stringify!($variant) => Ok($name::$variant),)+
                    _ => Err(ParseEnumError::new(stringify!($name), s)),
                }
            }
        }
    };
}

closed_enum! {
    /// The kind of thing measured at a point.
    ///
    /// `NoQuantity` marks a discrete (boolean) point rather than a physical
    /// measurement.
    pub enum PhysicalQuantity {
        NoQuantity,
        Current,
        Voltage,
        ActivePower,
        ReactivePower,
        ApparentPower,
        Energy,
        Frequency,
        Temperature,
        PowerFactor,
    }
}

impl PhysicalQuantity {
    /// True for points whose samples are booleans.
    pub fn is_discrete(&self) -> bool {
        matches!(self, PhysicalQuantity::NoQuantity)
    }
}

closed_enum! {
    /// Base unit a point's value is expressed in.
    pub enum BaseUnitOfMeasure {
        NoUnit,
        Ampere,
        Volt,
        Watt,
        VoltAmpereReactive,
        VoltAmpere,
        WattHour,
        Hertz,
        Kelvin,
        DegreeCelsius,
        Percent,
    }
}

impl BaseUnitOfMeasure {
    /// Display symbol (e.g. "A" for ampere).
    pub fn symbol(&self) -> &'static str {
        match self {
            BaseUnitOfMeasure::NoUnit => "",
            BaseUnitOfMeasure::Ampere => "A",
            BaseUnitOfMeasure::Volt => "V",
            BaseUnitOfMeasure::Watt => "W",
            BaseUnitOfMeasure::VoltAmpereReactive => "var",
            BaseUnitOfMeasure::VoltAmpere => "VA",
            BaseUnitOfMeasure::WattHour => "Wh",
            BaseUnitOfMeasure::Hertz => "Hz",
            BaseUnitOfMeasure::Kelvin => "K",
            BaseUnitOfMeasure::DegreeCelsius => "°C",
            BaseUnitOfMeasure::Percent => "%",
        }
    }
}

closed_enum! {
    /// SI prefix applied to the base unit.
    pub enum UnitPrefix {
        NoPrefix,
        Micro,
        Milli,
        Kilo,
        Mega,
        Giga,
    }
}

impl UnitPrefix {
    /// Display symbol (e.g. "k" for kilo).
    pub fn symbol(&self) -> &'static str {
        match self {
            UnitPrefix::NoPrefix => "",
            UnitPrefix::Micro => "µ",
            UnitPrefix::Milli => "m",
            UnitPrefix::Kilo => "k",
            UnitPrefix::Mega => "M",
            UnitPrefix::Giga => "G",
        }
    }
}

closed_enum! {
    /// Advisory read/write capability. Enforcement belongs to the protocol layer.
    pub enum AccessRight {
        Read,
        Write,
        ReadWrite,
    }
}

impl AccessRight {
    pub fn is_readable(&self) -> bool {
        matches!(self, AccessRight::Read | AccessRight::ReadWrite)
    }

    pub fn is_writable(&self) -> bool {
        matches!(self, AccessRight::Write | AccessRight::ReadWrite)
    }
}

closed_enum! {
    /// Trustworthiness of a sample.
    pub enum Quality {
        Good,
        Uncertain,
        Bad,
    }
}

impl Default for Quality {
    fn default() -> Self {
        Quality::Good
    }
}

closed_enum! {
    /// How a discrete point treats raw values other than "0" and "1".
    pub enum DiscreteCoercion {
        /// Reject the update with `PointError::InvalidDiscreteValue`.
        Strict,
        /// Accept the update with an absent value.
        Lenient,
    }
}

impl Default for DiscreteCoercion {
    fn default() -> Self {
        DiscreteCoercion::Strict
    }
}
