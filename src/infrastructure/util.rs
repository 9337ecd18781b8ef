use crate::application::ports::util::TokenGenerator;
use rand::RngCore;
use rand::rngs::OsRng;

/// 32 bytes of OS entropy, hex-encoded. 256 bits makes collisions between
/// outstanding credentials negligible without a store-level uniqueness check.
#[derive(Default, Clone)]
pub struct HexTokenGenerator;

impl TokenGenerator for HexTokenGenerator {
    fn generate(&self) -> String {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        bytes.iter().map(|b| format!("{b:02x}")).collect()
    }
}
