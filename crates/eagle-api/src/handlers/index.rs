pub const BANNER: &str = "EAGLE Lens Server Running! Use /api/query or /api/run-inference.";

pub async fn index_banner() -> &'static str {
    BANNER
}
