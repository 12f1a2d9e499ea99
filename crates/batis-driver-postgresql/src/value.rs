use batis_core::{
    driver::ScanType,
    err,
    pg::{Circle, GeoBox, Line, Lseg, Path, Point, Polygon, Range, Record, Vector},
    Composite, Error, Result, Value as CoreValue,
};
use postgres_types::{private::BytesMut, to_sql_checked, Format, FromSql, IsNull, Kind, ToSql, Type};
use std::{fmt::Write, ops::Bound};

/// Seconds between the Unix epoch and PostgreSQL's epoch, 2000-01-01.
const PG_EPOCH: i64 = 946_684_800;

#[derive(Debug)]
pub struct Value(CoreValue);

impl From<CoreValue> for Value {
    fn from(value: CoreValue) -> Self {
        Self(value)
    }
}

impl Value {
    pub fn into_inner(self) -> CoreValue {
        self.0
    }

    /// Decodes column `index` of a row.
    pub fn from_row(row: &tokio_postgres::Row, index: usize) -> Result<Self> {
        let ty = row.columns()[index].type_();
        let raw = row
            .try_get::<usize, Option<Raw<'_>>>(index)
            .map_err(Error::driver_operation_failed)?;

        match raw {
            Some(Raw(raw)) => decode(ty, raw).map(Value),
            None => Ok(Value(CoreValue::Null)),
        }
    }

    /// Whether this parameter has a binary encoding for `ty`. Everything else
    /// is sent in text format and parsed by the server.
    fn is_binary(&self, ty: &Type) -> bool {
        match &self.0 {
            CoreValue::Bool(_) => *ty == Type::BOOL,
            CoreValue::I64(_) => matches!(
                *ty,
                Type::INT2 | Type::INT4 | Type::INT8 | Type::OID | Type::FLOAT4 | Type::FLOAT8
            ),
            CoreValue::F64(_) => matches!(*ty, Type::FLOAT4 | Type::FLOAT8),
            CoreValue::String(_) => <&str as ToSql>::accepts(ty),
            CoreValue::Bytes(_) => *ty == Type::BYTEA,
            _ => false,
        }
    }
}

/// The undecoded bytes of a column, whatever its type.
struct Raw<'a>(&'a [u8]);

impl<'a> FromSql<'a> for Raw<'a> {
    fn from_sql(
        _: &Type,
        raw: &'a [u8],
    ) -> std::result::Result<Self, Box<dyn std::error::Error + Sync + Send>> {
        Ok(Raw(raw))
    }

    fn accepts(_: &Type) -> bool {
        true
    }
}

impl ToSql for Value {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> std::result::Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        if !self.is_binary(ty) {
            return match text(&self.0)? {
                Some(text) => {
                    out.extend_from_slice(text.as_bytes());
                    Ok(IsNull::No)
                }
                None => Ok(IsNull::Yes),
            };
        }

        match &self.0 {
            CoreValue::Bool(value) => value.to_sql(ty, out),
            CoreValue::I64(value) => match *ty {
                Type::INT2 => i16::try_from(*value)?.to_sql(ty, out),
                Type::INT4 => i32::try_from(*value)?.to_sql(ty, out),
                Type::OID => u32::try_from(*value)?.to_sql(ty, out),
                Type::FLOAT4 => (*value as f32).to_sql(ty, out),
                Type::FLOAT8 => (*value as f64).to_sql(ty, out),
                _ => value.to_sql(ty, out),
            },
            CoreValue::F64(value) => match *ty {
                Type::FLOAT4 => (*value as f32).to_sql(ty, out),
                _ => value.to_sql(ty, out),
            },
            CoreValue::String(value) => value.as_str().to_sql(ty, out),
            CoreValue::Bytes(value) => value.as_slice().to_sql(ty, out),
            value => Err(Box::new(Error::type_conversion(
                value.type_name(),
                "postgres parameter",
            ))),
        }
    }

    fn accepts(_: &Type) -> bool {
        true
    }

    fn encode_format(&self, ty: &Type) -> Format {
        if self.is_binary(ty) {
            Format::Binary
        } else {
            Format::Text
        }
    }

    to_sql_checked!();
}

/// Text format of a parameter. Lists and maps have none; bind them through
/// a composite codec instead.
fn text(value: &CoreValue) -> Result<Option<String>> {
    Ok(Some(match value {
        CoreValue::Null => return Ok(None),
        CoreValue::Bool(v) => (if *v { "t" } else { "f" }).to_string(),
        CoreValue::I64(v) => v.to_string(),
        CoreValue::F64(v) => v.to_string(),
        CoreValue::String(v) => v.clone(),
        CoreValue::Bytes(v) => {
            let mut out = String::with_capacity(2 + v.len() * 2);
            out.push_str("\\x");
            for byte in v {
                let _ = write!(out, "{byte:02x}");
            }
            out
        }
        CoreValue::Timestamp(v) => v.to_string(),
        CoreValue::DateTime(v) => v.to_string(),
        CoreValue::Date(v) => v.to_string(),
        CoreValue::Composite(v) => v.text.clone(),
        value @ (CoreValue::List(_) | CoreValue::Map(_)) => {
            return Err(Error::type_conversion(value.type_name(), "postgres parameter"))
        }
    }))
}

/// Scan type for a result column.
pub(crate) fn scan_type(ty: &Type) -> ScanType {
    match *ty {
        Type::BOOL => ScanType::Bool,
        Type::INT2 | Type::INT4 | Type::INT8 | Type::OID => ScanType::I64,
        Type::FLOAT4 | Type::FLOAT8 => ScanType::F64,
        Type::BYTEA => ScanType::Bytes,
        Type::TIMESTAMPTZ => ScanType::Timestamp,
        Type::TIMESTAMP => ScanType::DateTime,
        Type::DATE => ScanType::Date,
        Type::NUMERIC | Type::UUID | Type::JSON | Type::JSONB | Type::TIME => ScanType::Text,
        _ if <&str as FromSql>::accepts(ty) => ScanType::Text,
        _ => match ty.kind() {
            Kind::Enum(_) => ScanType::Text,
            Kind::Domain(inner) => scan_type(inner),
            _ => ScanType::Any,
        },
    }
}

/// Decodes one value in binary format. Non-scalar types become composites in
/// their text form; types without a decoder are kept as raw bytes.
fn decode(ty: &Type, raw: &[u8]) -> Result<CoreValue> {
    let mut buf = Reader(raw);

    let value = match *ty {
        Type::BOOL => CoreValue::Bool(buf.u8()? != 0),
        Type::INT2 => CoreValue::I64(buf.i16()?.into()),
        Type::INT4 => CoreValue::I64(buf.i32()?.into()),
        Type::INT8 => CoreValue::I64(buf.i64()?),
        Type::OID => CoreValue::I64(buf.u32()?.into()),
        Type::FLOAT4 => CoreValue::F64(buf.f32()?.into()),
        Type::FLOAT8 => CoreValue::F64(buf.f64()?),
        Type::BYTEA => CoreValue::Bytes(raw.to_vec()),
        Type::NUMERIC => CoreValue::String(numeric(&mut buf)?),
        Type::UUID => CoreValue::String(
            uuid::Uuid::from_slice(raw)
                .map_err(Error::driver_operation_failed)?
                .to_string(),
        ),
        Type::JSON => CoreValue::String(utf8(raw)?),
        Type::JSONB => match raw.split_first() {
            Some((1, json)) => CoreValue::String(utf8(json)?),
            _ => return Err(err!("unsupported jsonb version")),
        },
        Type::TIMESTAMPTZ => CoreValue::Timestamp(timestamp(buf.i64()?)?),
        Type::TIMESTAMP => CoreValue::DateTime(
            timestamp(buf.i64()?)?
                .to_zoned(jiff::tz::TimeZone::UTC)
                .datetime(),
        ),
        Type::DATE => {
            let days = i64::from(buf.i32()?);
            let ts = jiff::Timestamp::from_second(PG_EPOCH + days * 86_400)
                .map_err(Error::driver_operation_failed)?;
            CoreValue::Date(ts.to_zoned(jiff::tz::TimeZone::UTC).date())
        }
        Type::TIME => {
            let time = jiff::civil::Time::midnight()
                .checked_add(jiff::SignedDuration::from_micros(buf.i64()?))
                .map_err(Error::driver_operation_failed)?;
            CoreValue::String(time.to_string())
        }
        Type::POINT => buf.point()?.into(),
        Type::LSEG => Lseg::new(buf.point()?, buf.point()?).into(),
        Type::BOX => GeoBox::new(buf.point()?, buf.point()?).into(),
        Type::LINE => Line::new(buf.f64()?, buf.f64()?, buf.f64()?).into(),
        Type::CIRCLE => Circle::new(buf.point()?, buf.f64()?).into(),
        Type::PATH => {
            let closed = buf.u8()? != 0;
            let points = buf.points()?;
            Path { closed, points }.into()
        }
        Type::POLYGON => Polygon::new(buf.points()?).into(),
        Type::RECORD => record(&mut buf)?,
        _ if <&str as FromSql>::accepts(ty) => CoreValue::String(utf8(raw)?),
        _ => match ty.kind() {
            Kind::Array(member) => array(ty, member, raw)?,
            Kind::Range(member) => range(member, &mut buf)?,
            Kind::Composite(_) => record(&mut buf)?,
            Kind::Domain(inner) => return decode(inner, raw),
            Kind::Enum(_) => CoreValue::String(utf8(raw)?),
            _ if ty.name() == "vector" => vector(&mut buf)?,
            _ => CoreValue::Bytes(raw.to_vec()),
        },
    };

    Ok(value)
}

fn timestamp(micros: i64) -> Result<jiff::Timestamp> {
    PG_EPOCH
        .checked_mul(1_000_000)
        .and_then(|epoch| epoch.checked_add(micros))
        .ok_or_else(|| Error::type_conversion("infinity", "timestamp"))
        .and_then(|micros| {
            jiff::Timestamp::from_microsecond(micros).map_err(Error::driver_operation_failed)
        })
}

fn utf8(raw: &[u8]) -> Result<String> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(Error::driver_operation_failed)
}

/// Text of a decoded element, as the backend would print it inside an array,
/// range or record.
fn element_text(value: CoreValue) -> Result<Option<String>> {
    match value {
        CoreValue::Composite(Composite { text, .. }) => Ok(Some(text)),
        value => text(&value),
    }
}

/// Decodes `raw` as `ty` and returns its element text.
fn decode_element(ty: &Type, raw: Option<&[u8]>) -> Result<Option<String>> {
    match raw {
        Some(raw) => element_text(decode(ty, raw)?),
        None => Ok(None),
    }
}

fn array(ty: &Type, member: &Type, raw: &[u8]) -> Result<CoreValue> {
    let items = <Vec<Option<Raw<'_>>> as FromSql>::from_sql(ty, raw)
        .map_err(|err| err!("decoding `{ty}`: {err}"))?;

    let delim = if *member == Type::BOX { ';' } else { ',' };
    let mut out = String::from("{");

    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.push(delim);
        }
        match decode_element(member, item.map(|Raw(raw)| raw))? {
            Some(text) => push_array_element(&mut out, &text, delim),
            None => out.push_str("NULL"),
        }
    }
    out.push('}');

    Ok(CoreValue::Composite(Composite::new(array_type_name(member), out)))
}

fn push_array_element(out: &mut String, text: &str, delim: char) {
    let needs_quotes = text.is_empty()
        || text.eq_ignore_ascii_case("NULL")
        || text
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '{' | '}' | '"' | '\\') || c == delim);

    if !needs_quotes {
        out.push_str(text);
        return;
    }

    out.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
}

fn array_type_name(member: &Type) -> &'static str {
    match *member {
        Type::BOOL => "bool[]",
        Type::INT2 => "int2[]",
        Type::INT4 => "int4[]",
        Type::INT8 => "int8[]",
        Type::FLOAT4 => "float4[]",
        Type::FLOAT8 => "float8[]",
        Type::NUMERIC => "numeric[]",
        Type::TEXT => "text[]",
        Type::VARCHAR => "varchar[]",
        Type::BYTEA => "bytea[]",
        Type::UUID => "uuid[]",
        Type::DATE => "date[]",
        Type::TIMESTAMP => "timestamp[]",
        Type::TIMESTAMPTZ => "timestamptz[]",
        Type::POINT => "point[]",
        Type::LSEG => "lseg[]",
        Type::BOX => "box[]",
        Type::LINE => "line[]",
        Type::CIRCLE => "circle[]",
        Type::PATH => "path[]",
        Type::POLYGON => "polygon[]",
        Type::RECORD => "record[]",
        _ => "array",
    }
}

const RANGE_EMPTY: u8 = 0x01;
const RANGE_LB_INC: u8 = 0x02;
const RANGE_UB_INC: u8 = 0x04;
const RANGE_LB_INF: u8 = 0x08;
const RANGE_UB_INF: u8 = 0x10;

fn range(member: &Type, buf: &mut Reader<'_>) -> Result<CoreValue> {
    let flags = buf.u8()?;
    if flags & RANGE_EMPTY != 0 {
        return Ok(Range::Empty.into());
    }

    let mut bound = |inf: u8, inc: u8| -> Result<Bound<String>> {
        if flags & inf != 0 {
            return Ok(Bound::Unbounded);
        }
        let text = decode_element(member, buf.field()?)?.unwrap_or_default();
        Ok(if flags & inc != 0 {
            Bound::Included(text)
        } else {
            Bound::Excluded(text)
        })
    };

    let lower = bound(RANGE_LB_INF, RANGE_LB_INC)?;
    let upper = bound(RANGE_UB_INF, RANGE_UB_INC)?;
    Ok(Range::new(lower, upper).into())
}

fn record(buf: &mut Reader<'_>) -> Result<CoreValue> {
    let count = buf.i32()?;
    let mut fields = Vec::with_capacity(count.max(0) as usize);

    for _ in 0..count {
        let oid = buf.u32()?;
        let raw = buf.field()?;
        let field = match Type::from_oid(oid) {
            Some(ty) => decode_element(&ty, raw)?,
            None => raw.map(utf8).transpose()?,
        };
        fields.push(field);
    }

    Ok(Record(fields).into())
}

fn vector(buf: &mut Reader<'_>) -> Result<CoreValue> {
    let dim = buf.u16()?;
    let _unused = buf.u16()?;
    let items = (0..dim).map(|_| buf.f32()).collect::<Result<Vec<_>>>()?;
    Ok(Vector(items).into())
}

const NUMERIC_NEG: u16 = 0x4000;
const NUMERIC_NAN: u16 = 0xC000;
const NUMERIC_PINF: u16 = 0xD000;
const NUMERIC_NINF: u16 = 0xF000;

/// Prints a binary `numeric` in plain decimal notation. Digits are base
/// 10000 groups; `weight` is the exponent of the first group.
fn numeric(buf: &mut Reader<'_>) -> Result<String> {
    let ndigits = buf.i16()?.max(0) as usize;
    let weight = i64::from(buf.i16()?);
    let sign = buf.u16()?;
    let dscale = usize::from(buf.u16()?);

    match sign {
        NUMERIC_NAN => return Ok("NaN".to_string()),
        NUMERIC_PINF => return Ok("Infinity".to_string()),
        NUMERIC_NINF => return Ok("-Infinity".to_string()),
        _ => {}
    }

    let digits = (0..ndigits).map(|_| buf.i16()).collect::<Result<Vec<_>>>()?;
    let digit = |i: i64| -> i16 {
        usize::try_from(i)
            .ok()
            .and_then(|i| digits.get(i).copied())
            .unwrap_or(0)
    };

    let mut out = String::new();
    if sign == NUMERIC_NEG {
        out.push('-');
    }

    if weight < 0 {
        out.push('0');
    } else {
        for i in 0..=weight {
            if i == 0 {
                let _ = write!(out, "{}", digit(i));
            } else {
                let _ = write!(out, "{:04}", digit(i));
            }
        }
    }

    if dscale > 0 {
        let mut frac = String::new();
        let mut i = weight + 1;
        while frac.len() < dscale {
            let _ = write!(frac, "{:04}", digit(i));
            i += 1;
        }
        frac.truncate(dscale);
        out.push('.');
        out.push_str(&frac);
    }

    Ok(out)
}

/// Cursor over a big-endian binary value.
struct Reader<'a>(&'a [u8]);

impl<'a> Reader<'a> {
    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        if self.0.len() < N {
            return Err(err!("truncated binary value"));
        }
        let (head, rest) = self.0.split_at(N);
        self.0 = rest;

        let mut bytes = [0; N];
        bytes.copy_from_slice(head);
        Ok(bytes)
    }

    fn u8(&mut self) -> Result<u8> {
        self.take::<1>().map(|[b]| b)
    }

    fn u16(&mut self) -> Result<u16> {
        self.take().map(u16::from_be_bytes)
    }

    fn i16(&mut self) -> Result<i16> {
        self.take().map(i16::from_be_bytes)
    }

    fn i32(&mut self) -> Result<i32> {
        self.take().map(i32::from_be_bytes)
    }

    fn u32(&mut self) -> Result<u32> {
        self.take().map(u32::from_be_bytes)
    }

    fn i64(&mut self) -> Result<i64> {
        self.take().map(i64::from_be_bytes)
    }

    fn f32(&mut self) -> Result<f32> {
        self.take().map(f32::from_be_bytes)
    }

    fn f64(&mut self) -> Result<f64> {
        self.take().map(f64::from_be_bytes)
    }

    fn point(&mut self) -> Result<Point> {
        Ok(Point::new(self.f64()?, self.f64()?))
    }

    fn points(&mut self) -> Result<Vec<Point>> {
        let count = self.i32()?;
        (0..count).map(|_| self.point()).collect()
    }

    /// A length-prefixed field; length -1 is NULL.
    fn field(&mut self) -> Result<Option<&'a [u8]>> {
        let len = self.i32()?;
        let Ok(len) = usize::try_from(len) else {
            return Ok(None);
        };
        if self.0.len() < len {
            return Err(err!("truncated binary value"));
        }
        let (head, rest) = self.0.split_at(len);
        self.0 = rest;
        Ok(Some(head))
    }
}
