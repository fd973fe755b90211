/*
 * Responsibility
 * - Public surface of the middleware layer
 * - bearer authentication, HTTP plumbing, CORS
 */
pub mod auth;
pub mod cors;
pub mod http;
