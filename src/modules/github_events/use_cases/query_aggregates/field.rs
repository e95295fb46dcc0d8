use strum::{AsRefStr, Display, EnumString};

/// Named read operation. Names are matched exactly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, Display)]
pub enum QueryField {
    Repos,
    Actors,
    Events,
}
