#[tokio::main]
async fn main() {
    yourway_backend::run().await;
}
