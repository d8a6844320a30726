pub mod http_restaurant_service;
