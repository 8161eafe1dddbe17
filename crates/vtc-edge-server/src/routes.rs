use std::path::PathBuf;

use actix_files::{Files, NamedFile};
use actix_web::{
    dev::{fn_service, ServiceRequest, ServiceResponse},
    HttpResponse,
};

pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Serves the compiled dashboard. Paths that are not files get `index.html`
/// so the dashboard's own router can handle them.
pub fn front_end(front_end_folder: PathBuf) -> Files {
    let index_path = front_end_folder.join("index.html");
    Files::new("/", front_end_folder)
        .index_file("index.html")
        .default_handler(fn_service(move |req: ServiceRequest| {
            let index_path = index_path.clone();
            async move {
                let (req, _) = req.into_parts();
                let file = NamedFile::open_async(index_path).await?;
                let res = file.into_response(&req);
                Ok(ServiceResponse::new(req, res))
            }
        }))
}
