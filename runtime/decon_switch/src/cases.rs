//! One entry point for every dispatcher kind.

use std::sync::Arc;

use decon_ir::{ConstructionError, Type};
use decon_patterns::Pattern;

use crate::dispatch::Dispatcher;
use crate::enums::EnumSwitch;
use crate::pattern_switch::PatternSwitch;
use crate::scalar::{DoubleSwitch, FloatSwitch, IntSwitch, LongSwitch};
use crate::string::StringSwitch;
use crate::type_switch::{TypeLabel, TypeSwitch};

/// The ordered cases of a switch.
#[derive(Clone, Debug)]
pub enum SwitchCases {
    Patterns(Vec<Pattern>),
    Ints(Vec<i32>),
    Longs(Vec<i64>),
    Floats(Vec<f32>),
    Doubles(Vec<f64>),
    /// `None` entries never match.
    Strings(Vec<Option<String>>),
    /// Constant names of `enum_type`; `None` entries are rejected.
    Enum {
        enum_type: Type,
        labels: Vec<Option<String>>,
    },
    Types(Vec<TypeLabel>),
}

impl SwitchCases {
    pub fn kind(&self) -> &'static str {
        match self {
            SwitchCases::Patterns(_) => "pattern",
            SwitchCases::Ints(_) => "int",
            SwitchCases::Longs(_) => "long",
            SwitchCases::Floats(_) => "float",
            SwitchCases::Doubles(_) => "double",
            SwitchCases::Strings(_) => "String",
            SwitchCases::Enum { .. } => "enum",
            SwitchCases::Types(_) => "type",
        }
    }
}

/// Compile `cases` into a dispatcher over targets of `static_type`.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(static_type = %static_type, kind = cases.kind())
)]
pub fn build_dispatcher(
    static_type: Type,
    cases: SwitchCases,
) -> Result<Arc<dyn Dispatcher>, ConstructionError> {
    let dispatcher: Arc<dyn Dispatcher> = match cases {
        SwitchCases::Patterns(patterns) => Arc::new(PatternSwitch::new(static_type, &patterns)?),
        SwitchCases::Ints(labels) => Arc::new(IntSwitch::new(static_type, labels)?),
        SwitchCases::Longs(labels) => Arc::new(LongSwitch::new(static_type, labels)?),
        SwitchCases::Floats(labels) => Arc::new(FloatSwitch::new(static_type, labels)?),
        SwitchCases::Doubles(labels) => Arc::new(DoubleSwitch::new(static_type, labels)?),
        SwitchCases::Strings(labels) => Arc::new(StringSwitch::new(static_type, labels)?),
        SwitchCases::Enum { enum_type, labels } => {
            Arc::new(EnumSwitch::new(static_type, &enum_type, labels)?)
        }
        SwitchCases::Types(labels) => Arc::new(TypeSwitch::new(static_type, labels)?),
    };
    Ok(dispatcher)
}
