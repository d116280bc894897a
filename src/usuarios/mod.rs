// src/usuarios/mod.rs

// Declara o submódulo que contém as definições das structs de usuários
pub mod usuario_structs;
// Cadastro, login, sessões e emissão de tokens
pub mod usuario_service;
// Declara o submódulo que contém as funções de rota relacionadas a usuários
pub mod usuario_router;
// Extrator de autenticação
pub mod auth_middleware;
