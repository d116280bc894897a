// src/pedidos/mod.rs

pub mod pedidos_structs;
pub mod pedidos_service;
pub mod pedidos_router;
