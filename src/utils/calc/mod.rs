pub mod uniswap_v2;
