use super::Error;

/// The PostgreSQL text format a codec was reading or writing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Family {
    IntArray,
    FloatArray,
    BoolArray,
    StringArray,
    Point,
    PointArray,
    Box,
    BoxArray,
    Circle,
    CircleArray,
    Line,
    LineArray,
    Lseg,
    LsegArray,
    Path,
    PathArray,
    Polygon,
    PolygonArray,
    Range,
    RangeArray,
    Record,
    RecordArray,
    Vector,
}

impl Family {
    pub fn name(self) -> &'static str {
        match self {
            Family::IntArray => "integer array",
            Family::FloatArray => "float array",
            Family::BoolArray => "boolean array",
            Family::StringArray => "string array",
            Family::Point => "point",
            Family::PointArray => "point array",
            Family::Box => "box",
            Family::BoxArray => "box array",
            Family::Circle => "circle",
            Family::CircleArray => "circle array",
            Family::Line => "line",
            Family::LineArray => "line array",
            Family::Lseg => "lseg",
            Family::LsegArray => "lseg array",
            Family::Path => "path",
            Family::PathArray => "path array",
            Family::Polygon => "polygon",
            Family::PolygonArray => "polygon array",
            Family::Range => "range",
            Family::RangeArray => "range array",
            Family::Record => "record",
            Family::RecordArray => "record array",
            Family::Vector => "vector",
        }
    }
}

impl core::fmt::Display for Family {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// Error when a composite value's text representation is malformed.
#[derive(Debug)]
pub(super) struct InvalidFormat {
    family: Family,
    detail: Box<str>,
}

impl std::error::Error for InvalidFormat {}

impl core::fmt::Display for InvalidFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        write!(f, "invalid {} value: {}", self.family, self.detail)
    }
}

impl Error {
    /// Creates an invalid format error for the given codec family.
    pub fn invalid_format(family: Family, detail: impl Into<String>) -> Error {
        Error::from(super::ErrorKind::InvalidFormat(InvalidFormat {
            family,
            detail: detail.into().into(),
        }))
    }

    /// Returns the codec family if this error is an invalid format error.
    pub fn invalid_format_family(&self) -> Option<Family> {
        match self.root_kind() {
            super::ErrorKind::InvalidFormat(err) => Some(err.family),
            _ => None,
        }
    }

    /// Returns `true` if this error is an invalid format error.
    pub fn is_invalid_format(&self) -> bool {
        self.invalid_format_family().is_some()
    }
}
