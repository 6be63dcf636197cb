//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! document for the REST API. It registers:
//!
//! - **Paths**: the message endpoints and the health probes
//! - **Schemas**: the request and response bodies plus domain type wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`]) that provide OpenAPI definitions
//!   without coupling domain types to the utoipa framework
//!
//! The generated document is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::messages::{
    CreateMessageRequest, DeletedMessageBody, MessageBody, MessageListBody, UpdateMessageRequest,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Message board API",
        description = "Create, read, update, and delete messages posted by registered users.",
        license(name = "ISC", url = "https://opensource.org/license/isc-license-txt")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::messages::list_messages,
        crate::inbound::http::messages::get_message,
        crate::inbound::http::messages::create_message,
        crate::inbound::http::messages::update_message,
        crate::inbound::http::messages::delete_message,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        MessageBody,
        MessageListBody,
        CreateMessageRequest,
        UpdateMessageRequest,
        DeletedMessageBody,
        ErrorSchema,
        ErrorCodeSchema
    )),
    tags(
        (name = "messages", description = "Message board operations"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying OpenAPI schema field structure.

    use super::*;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // Note: utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "crate.domain.Error";

    /// Assert that an Object schema contains a field with the given name.
    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        match schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(
                    obj.properties.contains_key(field),
                    "schema should have field '{field}'"
                );
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_error_schema_has_envelope_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("Error schema");

        assert_object_schema_has_field(error_schema, "error");
        assert_object_schema_has_field(error_schema, "code");
        assert_object_schema_has_field(error_schema, "traceId");
        assert_object_schema_has_field(error_schema, "details");
    }

    #[test]
    fn openapi_message_schema_uses_underscore_id() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let message_schema = schemas.get("MessageBody").expect("MessageBody schema");

        assert_object_schema_has_field(message_schema, "_id");
        assert_object_schema_has_field(message_schema, "author");
    }

    #[test]
    fn openapi_documents_every_message_route() {
        let doc = ApiDoc::openapi();
        let collection = doc.paths.paths.get("/messages").expect("collection path");
        let item = doc.paths.paths.get("/messages/{id}").expect("item path");

        assert!(collection.get.is_some());
        assert!(collection.post.is_some());
        assert!(item.get.is_some());
        assert!(item.put.is_some());
        assert!(item.delete.is_some());
    }
}
