pub mod dtos {
    pub mod usage;
}
pub mod routes {
    pub mod usage;
}
pub mod services {
    pub mod usage;
}

pub fn mount_usage() -> actix_web::Scope {
    routes::usage::mount()
}
