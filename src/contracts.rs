//! Known contract interfaces
//!
//! Solidity interfaces the toolkit calls and decodes, expressed with
//! `alloy_sol_types::sol!`. Covers the FractionFactory entry point, the
//! fraction token constructor, and the event schemas the receipt resolver
//! understands.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::{sol, SolCall, SolValue};

sol! {
    /// FractionFactory entry point. Deploys an ERC-20 fraction token bound
    /// to an asset NFT and registers it.
    function createFraction(
        string name,
        string symbol,
        uint256 totalSupply,
        address assetNft,
        uint256 tokenId
    ) returns (address token);

    /// Emitted by the factory once per created fraction token.
    event FractionCreated(
        address indexed tokenAddress,
        address indexed assetNft,
        uint256 tokenId,
        uint256 totalSupply
    );

    /// ERC-20 transfer. The genesis mint of the new token emits one of
    /// these in the same transaction as `FractionCreated`.
    event Transfer(address indexed from, address indexed to, uint256 value);

    /// Emitted by AssetNFT when an asset is registered on-chain.
    event AssetMinted(address indexed to, uint256 indexed tokenId, string tokenUri);
}

/// ABI-encode a `createFraction` factory call
///
/// Arguments travel in declaration order: name, symbol, totalSupply,
/// assetNft, tokenId. The supply is a `U256` end to end.
pub fn create_fraction_calldata(
    name: &str,
    symbol: &str,
    total_supply: U256,
    asset_nft: Address,
    token_id: U256,
) -> Bytes {
    createFractionCall {
        name: name.to_string(),
        symbol: symbol.to_string(),
        totalSupply: total_supply,
        assetNft: asset_nft,
        tokenId: token_id,
    }
    .abi_encode()
    .into()
}

/// Build init code for a direct fraction-token deployment
///
/// Creation bytecode followed by the ABI-encoded constructor arguments
/// `(name, symbol, totalSupply)`.
pub fn fraction_init_code(bytecode: &[u8], name: &str, symbol: &str, total_supply: U256) -> Bytes {
    let ctor_args = (name.to_string(), symbol.to_string(), total_supply).abi_encode_params();

    let mut code = Vec::with_capacity(bytecode.len() + ctor_args.len());
    code.extend_from_slice(bytecode);
    code.extend_from_slice(&ctor_args);
    code.into()
}
