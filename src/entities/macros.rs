//! Macros for reducing boilerplate when defining stored records
//!
//! Every record carries `id: Uuid` and `created_at: Option<DateTime<Utc>>`
//! fields; the macro wires them, the owning account field and the queryable
//! fields into an [`Entity`](crate::core::entity::Entity) implementation.

/// Implement [`Entity`](crate::core::entity::Entity) for a record struct
///
/// # Example
///
/// ```rust,ignore
/// impl_entity!(
///     Customer,
///     "customer",
///     "customers",
///     owner: user_id,
///     {
///         "userId" => user_id,
///         "name" => name,
///         "phone" => phone,
///     }
/// );
/// ```
///
/// Each queryable field type must convert into
/// [`FieldValue`](crate::core::field::FieldValue).
#[macro_export]
macro_rules! impl_entity {
    (
        $type:ident,
        $singular:expr,
        $plural:expr,
        owner: $owner:ident,
        {
            $( $json_name:literal => $field:ident ),* $(,)?
        }
    ) => {
        impl $crate::core::entity::Entity for $type {
            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> ::uuid::Uuid {
                self.id
            }

            fn set_id(&mut self, id: ::uuid::Uuid) {
                self.id = id;
            }

            fn user_id(&self) -> ::uuid::Uuid {
                self.$owner
            }

            fn created_at(&self) -> Option<::chrono::DateTime<::chrono::Utc>> {
                self.created_at
            }

            fn set_created_at(&mut self, at: ::chrono::DateTime<::chrono::Utc>) {
                self.created_at = Some(at);
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                match field {
                    "id" => Some($crate::core::field::FieldValue::Uuid(self.id)),
                    "createdAt" => Some($crate::core::field::FieldValue::from(self.created_at)),
                    $( $json_name => Some($crate::core::field::FieldValue::from(self.$field.clone())), )*
                    _ => None,
                }
            }
        }
    };
}
