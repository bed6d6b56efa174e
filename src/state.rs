use cosmwasm_schema::cw_serde;
use cosmwasm_std::{Addr, StdResult, Storage, Uint128};
use cw_storage_plus::{Item, Map};

use crate::fraction::Fraction;

#[cw_serde]
pub struct Config {
    /// Receives the marketplace fee from every settlement.
    pub owner: Addr,
    /// Denomination accepted for native listings.
    pub denom: String,
    pub fee: Fraction,
}

#[cw_serde]
pub struct Listing {
    pub owner: Addr,
    pub token_id: String,
    pub nft_contract: Addr,
    /// `None` means the listing settles in native funds.
    pub payment_token: Option<Addr>,
    pub is_native: bool,
    pub price: Uint128,
    pub min_offer: Uint128,
    pub sold: bool,
}

#[cw_serde]
pub enum CoinType {
    Native,
    Cw20,
}

#[cw_serde]
pub struct Offer {
    pub listing_id: u64,
    pub offerrer: Addr,
    pub amount: Uint128,
    /// Recorded at offer time so escrow can be refunded even after the
    /// parent listing is gone.
    pub coin_type: CoinType,
    pub accepted: bool,
}

pub const CONFIG: Item<Config> = Item::new("config");

pub const LISTINGS: Map<u64, Listing> = Map::new("listings");
pub const LISTING_COUNT: Item<u64> = Item::new("listing_count");

pub const OFFERS: Map<u64, Offer> = Map::new("offers");
pub const OFFER_COUNT: Item<u64> = Item::new("offer_count");
/// (listing_id, bidder) -> offer_id. A bidder holds at most one pending
/// offer per listing; re-offering routes through this map and replaces it.
pub const OFFERS_BY_BIDDER: Map<(u64, &Addr), u64> = Map::new("offers_by_bidder");

pub fn next_listing_id(storage: &mut dyn Storage) -> StdResult<u64> {
    let id = LISTING_COUNT.may_load(storage)?.unwrap_or_default();
    LISTING_COUNT.save(storage, &(id + 1))?;
    Ok(id)
}

pub fn next_offer_id(storage: &mut dyn Storage) -> StdResult<u64> {
    let id = OFFER_COUNT.may_load(storage)?.unwrap_or_default();
    OFFER_COUNT.save(storage, &(id + 1))?;
    Ok(id)
}
