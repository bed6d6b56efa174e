use crate::fraction::Fraction;
use crate::state::{Listing, Offer};
use cosmwasm_schema::{cw_serde, QueryResponses};
use cosmwasm_std::{Addr, Uint128};

#[cw_serde]
pub struct InstantiateMsg {
    /// Native denomination accepted for native listings.
    pub denom: String,
    /// Marketplace cut, defaults to 3/100.
    pub fee: Option<Fraction>,
}

#[cw_serde]
pub enum ExecuteMsg {
    /// Escrows the NFT and opens a listing. The sender must have approved
    /// this contract as operator on the NFT contract beforehand.
    ListNft {
        nft_contract: String,
        token_id: String,
        /// cw20 contract settling the sale, or `None` for native funds.
        payment_token: Option<String>,
        is_native: bool,
        price: Uint128,
        min_offer: Uint128,
    },
    /// Outright purchase at the listed price. Native listings take the
    /// price as attached funds; token listings pull it from the buyer's
    /// cw20 allowance.
    BuyNft {
        listing_id: u64,
    },
    /// Bid on a listing. Native listings read the bid from the attached
    /// funds and `amount` must stay zero; token listings read it from
    /// `amount`.
    Offer {
        listing_id: u64,
        amount: Uint128,
    },
    AcceptOffer {
        offer_id: u64,
    },
    CancelOffer {
        offer_id: u64,
    },
    CancelListing {
        listing_id: u64,
    },
}

#[cw_serde]
#[derive(QueryResponses)]
pub enum QueryMsg {
    #[returns(Addr)]
    MarketOwner {},
    #[returns(Listing)]
    GetListing { id: u64 },
    #[returns(Offer)]
    GetOffer { id: u64 },
    #[returns(Vec<Listing>)]
    GetAllListings {
        from_index: Option<u64>,
        limit: Option<u64>,
    },
    #[returns(u64)]
    GetListingCount {},
    #[returns(Vec<Offer>)]
    GetOffersByListing {
        listing_id: u64,
        from_index: Option<u64>,
        limit: Option<u64>,
    },
}

#[cw_serde]
pub struct MigrateMsg {}
