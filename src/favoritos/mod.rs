// src/favoritos/mod.rs

pub mod favoritos_structs;
pub mod favoritos_service;
pub mod favoritos_router;
