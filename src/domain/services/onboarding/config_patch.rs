use tracing::info;

use crate::domain::ports::ForgeService;
use crate::error::AppError;

const RESTAURANT_ID_PREFIX: &str = "const RestaurantID = \"";

pub fn render_app_config(restaurant_id: &str, api_base_url: &str) -> String {
    format!(
        "{prefix}{id}\";\n\
         export const BASE_URL = '{base}';\n\
         export const RESTAURANT_URL = `/api/restaurant/${{RestaurantID}}`;\n\
         export const PRODUCTS_URL = `/api/restaurant/${{RestaurantID}}/products`;\n\
         export const AUTH_URL = `/api/restaurant/${{RestaurantID}}/users`;\n\
         export const ORDER_URL = `/api/restaurant/${{RestaurantID}}/orders`;\n\
         export const FEEDBACK_URL = `/api/restaurant/${{RestaurantID}}/feedback`;\n",
        prefix = RESTAURANT_ID_PREFIX,
        id = restaurant_id,
        base = api_base_url,
    )
}

pub fn embedded_restaurant_id(content: &str) -> Option<String> {
    content.lines().find_map(|line| {
        line.trim()
            .strip_prefix(RESTAURANT_ID_PREFIX)
            .and_then(|rest| rest.strip_suffix("\";"))
            .map(str::to_string)
    })
}

// The sha read first is sent back as the precondition, so a concurrent writer fails the update.
pub async fn patch_app_config(
    forge: &dyn ForgeService,
    repo: &str,
    path: &str,
    restaurant_id: &str,
    api_base_url: &str,
) -> Result<(), AppError> {
    let current = forge.get_file(repo, path).await?;
    let previous = embedded_restaurant_id(&current.content);

    let content = render_app_config(restaurant_id, api_base_url);
    forge
        .update_file(repo, path, &format!("Update RestaurantID in {}", path), &content, &current.sha)
        .await?;

    info!(repo = %repo, path = %path, previous = ?previous, restaurant_id = %restaurant_id, "Patched app config");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "https://api.fastnfresh.app/chai";

    #[test]
    fn renders_every_endpoint_from_the_id() {
        let content = render_app_config("rest-42", BASE);
        assert!(content.starts_with("const RestaurantID = \"rest-42\";\n"));
        assert!(content.contains("export const BASE_URL = 'https://api.fastnfresh.app/chai';"));
        for suffix in ["", "/products", "/users", "/orders", "/feedback"] {
            let line = format!("`/api/restaurant/${{RestaurantID}}{}`;", suffix);
            assert!(content.contains(&line), "missing {}", line);
        }
        assert_eq!(embedded_restaurant_id(&content).as_deref(), Some("rest-42"));
    }

    #[test]
    fn re_rendering_supersedes_the_previous_id() {
        let first = render_app_config("old-id", BASE);
        let second = render_app_config("new-id", BASE);
        assert!(!second.contains("old-id"));
        assert_eq!(embedded_restaurant_id(&second).as_deref(), Some("new-id"));
        assert_eq!(first, render_app_config("old-id", BASE));
    }

    #[test]
    fn template_file_without_declaration_has_no_id() {
        assert_eq!(embedded_restaurant_id("export const BASE_URL = '';\n"), None);
    }
}
