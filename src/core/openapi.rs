use utoipa::{Modify, OpenApi};

use crate::features::files::{dtos as files_dtos, handlers as files_handlers};

#[derive(OpenApi)]
#[openapi(
    paths(
        files_handlers::upload_file,
        files_handlers::download_latest,
        files_handlers::delete_latest,
    ),
    components(schemas(files_dtos::UploadFileDto)),
    tags(
        (name = "files", description = "Upload, download and delete files in the vault"),
    ),
    info(
        title = "File Vault API",
        version = "0.1.0",
        description = "Upload, download and delete files in the vault",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_documents_vault_endpoints() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/upload"));
        assert!(doc.paths.paths.contains_key("/download/latest"));
        assert!(doc.paths.paths.contains_key("/delete/latest"));
    }

    #[test]
    fn test_swagger_info_modifier_overrides_info() {
        let mut doc = ApiDoc::openapi();
        SwaggerInfoModifier {
            title: "Vault".to_string(),
            version: "9.9.9".to_string(),
            description: "desc".to_string(),
        }
        .modify(&mut doc);

        assert_eq!(doc.info.title, "Vault");
        assert_eq!(doc.info.version, "9.9.9");
        assert_eq!(doc.info.description.as_deref(), Some("desc"));
    }
}
