use cosmwasm_std::{StdError, Uint128};
use cw_utils::PaymentError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContractError {
    #[error("{0}")]
    Std(#[from] StdError),

    #[error("{0}")]
    Payment(#[from] PaymentError),

    #[error("Invalid price")]
    InvalidPrice {},

    #[error("Invalid min offer")]
    InvalidMinOffer {},

    #[error("ERC20 Payment is not supported")]
    Erc20NotSupported {},

    #[error("A token-settled listing needs a payment token")]
    Erc20PaymentRequired {},

    #[error("Already sold")]
    AlreadySold {},

    #[error("Attached funds do not match the price {price}")]
    IncorrectPrice { price: Uint128 },

    #[error("Offer is below the listing minimum {min_offer}")]
    InvalidOffer { min_offer: Uint128 },

    #[error("A native listing cannot take a token-denominated offer")]
    CannotOfferErc20 {},

    #[error("The lister cannot offer on their own listing")]
    OwnerCannotOffer {},

    #[error("Only the listing owner can accept offers")]
    UnauthorizedSeller {},

    #[error("Only the offerrer can cancel this offer")]
    UnauthorizedOfferrer {},

    #[error("Offer was already accepted")]
    OfferAlreadyAccepted {},

    #[error("Unauthorized")]
    UnauthorizedUser {},

    #[error("User is not the NFT owner")]
    NotNftOwner {},

    #[error("Marketplace allowance does not cover the offer")]
    InsufficientAllowance {},

    #[error("Fee must be a fraction below one")]
    InvalidFee {},

    #[error("Semver parsing error: {0}")]
    SemVer(String),

    #[error("Cannot migrate from version {stored} to {requested}")]
    CannotMigrate { stored: String, requested: String },
}

impl From<semver::Error> for ContractError {
    fn from(err: semver::Error) -> Self {
        Self::SemVer(err.to_string())
    }
}
