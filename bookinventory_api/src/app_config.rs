use actix_cors::Cors;
use actix_web::web::JsonConfig;
use paperclip::actix::web;

use crate::handlers::{self, ApiError};

pub fn config_app(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/").route(web::get().to(handlers::welcome)))
        .service(web::resource("/health").route(web::get().to(handlers::health)))
        .service(
            web::scope("/books")
                .service(web::resource("").route(web::get().to(handlers::get_all_books)))
                .service(web::resource("/add").route(web::post().to(handlers::add_book)))
                .service(
                    web::resource(r"/update/{isbn:\d+}")
                        .route(web::put().to(handlers::update_book)),
                )
                .service(
                    web::resource(r"/delete/{isbn:\d+}")
                        .route(web::delete().to(handlers::delete_book)),
                )
                .service(
                    web::resource(r"/{isbn:\d+}").route(web::get().to(handlers::get_book)),
                ),
        );
}

/// Any body that cannot be read as the expected JSON object is answered the same way
pub fn json_config() -> JsonConfig {
    JsonConfig::default().error_handler(|err, _req| {
        tracing::debug!("Rejected request payload {}", err);
        ApiError::NoInputData.into()
    })
}

/// Browser clients of any origin may call the API
pub fn cors() -> Cors {
    Cors::permissive()
}
