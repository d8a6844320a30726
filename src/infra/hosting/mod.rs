pub mod netlify_service;
