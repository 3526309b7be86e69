pub mod user {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod handle;
    pub mod service;
    pub mod route;
}

pub mod friend {
    pub mod schema;
    pub mod model;
    pub mod repository;
    pub mod repository_pg;
    pub mod handle;
    pub mod service;
    pub mod route;
}

pub mod session {
    pub mod service;
}

pub mod chat {
    pub mod model;
    pub mod provider;
    pub mod service;
    pub mod handle;
    pub mod route;
}
