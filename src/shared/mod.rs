// src/shared/mod.rs

// Estruturas de resposta e paginação usadas por todos os módulos
pub mod shared_structs;
// Erro das rotas e conversão para HTTP
pub mod erros;
