// src/vendedores/mod.rs

pub mod vendedores_structs;
pub mod vendedores_router;
