//! 常用代币与交易对常量定义
//!
//! Ethereum mainnet addresses of well-known tokens and Uniswap V2 pairs.

use alloy_primitives::{Address, address};

/// WETH (mainnet)
pub const WETH: Address = address!("0xc02aaa39b223fe8d0a0e5c4f27ead9083c756cc2");

/// USDT (mainnet)
pub const USDT: Address = address!("0xdac17f958d2ee523a2206206994597c13d831ec7");

/// USDC (mainnet)
pub const USDC: Address = address!("0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48");

/// DAI (mainnet)
pub const DAI: Address = address!("0x6b175474e89094c44da98b954eedeac495271d0f");

/// Uniswap V2 WETH/USDT pair. token0 = WETH, token1 = USDT.
pub const UNISWAP_V2_WETH_USDT: Address = address!("0x0d4a11d5eeaac28ec3f61d100daf4d40471f1852");

/// Uniswap V2 USDC/WETH pair. token0 = USDC, token1 = WETH.
pub const UNISWAP_V2_USDC_WETH: Address = address!("0xb4e16d0168e52d35cacd2c6185b44281ec28c9dc");

/// Returns the symbol of a known token, if any.
pub fn symbol_of(token: &Address) -> Option<&'static str> {
    [(WETH, "WETH"), (USDT, "USDT"), (USDC, "USDC"), (DAI, "DAI")]
        .into_iter()
        .find_map(|(address, symbol)| (address == *token).then_some(symbol))
}

/// Symbol for known tokens, the hex address otherwise. Used in log lines.
pub fn token_label(token: &Address) -> String {
    symbol_of(token).map_or_else(|| token.to_string(), str::to_owned)
}
