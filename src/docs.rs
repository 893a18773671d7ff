use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(crate::modules::compress::handler::compress),
    tags(
        (name = "Compress", description = "Shrink images, GIFs and videos")
    )
)]
pub struct ApiDoc;
