//! Data models for Gatepass

/// Store a string-backed enum in a Postgres TEXT column through its
/// `as_str` / `FromStr` pair.
macro_rules! text_column {
    ($ty:ty) => {
        impl sqlx::Type<sqlx::Postgres> for $ty {
            fn type_info() -> sqlx::postgres::PgTypeInfo {
                <String as sqlx::Type<sqlx::Postgres>>::type_info()
            }
        }

        impl<'r> sqlx::Decode<'r, sqlx::Postgres> for $ty {
            fn decode(
                value: sqlx::postgres::PgValueRef<'r>,
            ) -> Result<Self, sqlx::error::BoxDynError> {
                let s: String = sqlx::Decode::<sqlx::Postgres>::decode(value)?;
                s.parse().map_err(|e: String| e.into())
            }
        }

        impl sqlx::Encode<'_, sqlx::Postgres> for $ty {
            fn encode_by_ref(
                &self,
                buf: &mut sqlx::postgres::PgArgumentBuffer,
            ) -> sqlx::encode::IsNull {
                <&str as sqlx::Encode<sqlx::Postgres>>::encode(self.as_str(), buf)
            }
        }
    };
}

pub mod department;
pub mod employee;
pub mod staff;
pub mod visit;
pub mod visitor;

// Re-export commonly used types
pub use department::Department;
pub use employee::{Employee, EmployeeSummary};
pub use staff::{Role, SessionClaims, StaffAccount};
pub use visit::{Visit, VisitDetails, VisitStatus};
pub use visitor::{Visitor, VisitorType};
