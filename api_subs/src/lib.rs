pub mod dtos {
    pub mod sub;
}
pub mod routes {
    pub mod sub;
}
pub mod services {
    pub mod sub;
}

pub fn mount_subs() -> actix_web::Scope {
    routes::sub::mount()
}
