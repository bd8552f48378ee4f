//! Macros for reducing boilerplate when defining resources
//!
//! Every entity shares the same id accessor and route metadata shape; this
//! macro expands them inside a `Resource` impl block so the per-entity code
//! is reduced to what actually differs: the access policy table, the
//! payload encoding, and the update-merge rule.

/// Expand the route metadata and id accessor of a `Resource` impl.
///
/// # Example
///
/// ```rust,ignore
/// impl Resource for Department {
///     type Draft = DepartmentDraft;
///
///     resource_routes!(base: "Department", name: "department", delete_segment: "DeleteDepartment");
///
///     fn auth(op: Operation) -> Option<AuthPolicy> { ... }
///     fn encode(draft: &Self::Draft) -> ApiResult<Payload> { ... }
/// }
/// ```
#[macro_export]
macro_rules! resource_routes {
    (base: $base:literal, name: $name:literal) => {
        $crate::resource_routes!(base: $base, name: $name, delete_segment: "Delete");
    };
    (base: $base:literal, name: $name:literal, delete_segment: $del:literal) => {
        fn base_path() -> &'static str {
            $base
        }

        fn resource_name() -> &'static str {
            $name
        }

        fn delete_segment() -> &'static str {
            $del
        }

        fn id(&self) -> i64 {
            self.id
        }
    };
}
