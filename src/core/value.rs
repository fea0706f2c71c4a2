use chrono::NaiveDate;
use postgres::types::{IsNull, ToSql, Type, accepts, private::BytesMut, to_sql_checked};

/// A typed statement parameter collected from the operator.
///
/// Every operator-supplied value travels from the prompt to the gateway as
/// one of these variants and is bound to a `$n` placeholder; values are
/// never spliced into the statement text.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Int(i32),
    BigInt(i64),
    Text(String),
    Bool(bool),
    Date(NaiveDate),
}

impl ToSql for SqlValue {
    fn to_sql(
        &self,
        ty: &Type,
        out: &mut BytesMut,
    ) -> Result<IsNull, Box<dyn std::error::Error + Sync + Send>> {
        match self {
            // Widen integers when the column (or a LIMIT clause) wants a
            // larger type than the prompt produced.
            Self::Int(value) => {
                if *ty == Type::INT8 {
                    i64::from(*value).to_sql(ty, out)
                } else if *ty == Type::INT2 {
                    i16::try_from(*value)?.to_sql(ty, out)
                } else {
                    value.to_sql(ty, out)
                }
            }
            Self::BigInt(value) => value.to_sql(ty, out),
            Self::Text(value) => value.to_sql(ty, out),
            Self::Bool(value) => value.to_sql(ty, out),
            Self::Date(value) => value.to_sql(ty, out),
        }
    }

    accepts!(BOOL, INT2, INT4, INT8, TEXT, VARCHAR, BPCHAR, DATE);
    to_sql_checked!();
}
