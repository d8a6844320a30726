pub mod github_service;
