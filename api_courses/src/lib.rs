pub mod dtos {
    pub mod course;
}
pub mod routes {
    pub mod course;
}
pub mod services {
    pub mod access;
    pub mod generate;
}

pub fn mount_courses() -> actix_web::Scope {
    routes::course::mount()
}
