#[cfg(not(feature = "library"))]
use cosmwasm_std::entry_point;
use cosmwasm_std::{
    coins, to_json_binary, Addr, BankMsg, Binary, CosmosMsg, Deps, DepsMut, Env, MessageInfo,
    Order, Response, StdResult, Uint128, WasmMsg,
};
use cw2::{get_contract_version, set_contract_version};
use cw20::{AllowanceResponse, Cw20Contract, Cw20ExecuteMsg, Cw20QueryMsg};
use cw721::{Cw721ExecuteMsg, Cw721QueryMsg, OwnerOfResponse};
use cw_utils::{must_pay, nonpayable};
use semver::Version;

use crate::error::ContractError;
use crate::fraction::DEFAULT_FEE;
use crate::msg::{ExecuteMsg, InstantiateMsg, MigrateMsg, QueryMsg};
use crate::state::{
    next_listing_id, next_offer_id, CoinType, Config, Listing, Offer, CONFIG, LISTINGS, OFFERS,
    OFFERS_BY_BIDDER,
};

pub const CONTRACT_NAME: &str = "block-marketplace";
pub const CONTRACT_VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn instantiate(
    deps: DepsMut,
    _env: Env,
    info: MessageInfo,
    msg: InstantiateMsg,
) -> Result<Response, ContractError> {
    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    let fee = msg.fee.unwrap_or(DEFAULT_FEE);
    if !fee.is_valid() {
        return Err(ContractError::InvalidFee {});
    }

    let config = Config {
        owner: info.sender,
        denom: msg.denom,
        fee,
    };
    CONFIG.save(deps.storage, &config)?;

    Ok(Response::new()
        .add_attribute("action", "instantiate")
        .add_attribute("market_owner", config.owner)
        .add_attribute("denom", config.denom)
        .add_attribute("fee", config.fee.to_string()))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn execute(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    msg: ExecuteMsg,
) -> Result<Response, ContractError> {
    match msg {
        ExecuteMsg::ListNft {
            nft_contract,
            token_id,
            payment_token,
            is_native,
            price,
            min_offer,
        } => execute_list_nft(
            deps,
            env,
            info,
            nft_contract,
            token_id,
            payment_token,
            is_native,
            price,
            min_offer,
        ),
        ExecuteMsg::BuyNft { listing_id } => execute_buy_nft(deps, info, listing_id),
        ExecuteMsg::Offer { listing_id, amount } => {
            execute_offer(deps, env, info, listing_id, amount)
        }
        ExecuteMsg::AcceptOffer { offer_id } => execute_accept_offer(deps, info, offer_id),
        ExecuteMsg::CancelOffer { offer_id } => execute_cancel_offer(deps, info, offer_id),
        ExecuteMsg::CancelListing { listing_id } => {
            execute_cancel_listing(deps, info, listing_id)
        }
    }
}

#[allow(clippy::too_many_arguments)]
pub fn execute_list_nft(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    nft_contract: String,
    token_id: String,
    payment_token: Option<String>,
    is_native: bool,
    price: Uint128,
    min_offer: Uint128,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    if price.is_zero() {
        return Err(ContractError::InvalidPrice {});
    }
    if min_offer.is_zero() {
        return Err(ContractError::InvalidMinOffer {});
    }
    // a native listing carries no payment token, a cw20 listing must name one
    if is_native && payment_token.is_some() {
        return Err(ContractError::Erc20NotSupported {});
    }
    if !is_native && payment_token.is_none() {
        return Err(ContractError::Erc20PaymentRequired {});
    }

    let nft_contract = deps.api.addr_validate(&nft_contract)?;
    let payment_token = payment_token
        .map(|token| deps.api.addr_validate(&token))
        .transpose()?;

    let nft_owner: OwnerOfResponse = deps.querier.query_wasm_smart(
        nft_contract.to_string(),
        &Cw721QueryMsg::OwnerOf {
            token_id: token_id.clone(),
            include_expired: Some(false),
        },
    )?;
    if nft_owner.owner != info.sender {
        return Err(ContractError::NotNftOwner {});
    }

    // pull the NFT into escrow; fails in the same transaction if the seller
    // never approved this contract as operator
    let escrow_msg = WasmMsg::Execute {
        contract_addr: nft_contract.to_string(),
        msg: to_json_binary(&Cw721ExecuteMsg::TransferNft {
            recipient: env.contract.address.to_string(),
            token_id: token_id.clone(),
        })?,
        funds: vec![],
    };

    let listing = Listing {
        owner: info.sender,
        token_id: token_id.clone(),
        nft_contract,
        payment_token,
        is_native,
        price,
        min_offer,
        sold: false,
    };

    let listing_id = next_listing_id(deps.storage)?;
    LISTINGS.save(deps.storage, listing_id, &listing)?;

    Ok(Response::new()
        .add_attribute("action", "list_nft")
        .add_attribute("listing_id", listing_id.to_string())
        .add_attribute("token_id", token_id)
        .add_attribute("owner", listing.owner)
        .add_message(escrow_msg))
}

pub fn execute_buy_nft(
    deps: DepsMut,
    info: MessageInfo,
    listing_id: u64,
) -> Result<Response, ContractError> {
    let mut listing = LISTINGS.load(deps.storage, listing_id)?;

    if listing.sold {
        return Err(ContractError::AlreadySold {});
    }

    let config = CONFIG.load(deps.storage)?;
    let fee = config.fee.of(listing.price);
    let seller_net = listing.price - fee;

    let mut msgs: Vec<CosmosMsg> = vec![];
    if listing.is_native {
        let paid = must_pay(&info, &config.denom)?;
        if paid != listing.price {
            return Err(ContractError::IncorrectPrice {
                price: listing.price,
            });
        }
        msgs.push(
            BankMsg::Send {
                to_address: listing.owner.to_string(),
                amount: coins(seller_net.u128(), &config.denom),
            }
            .into(),
        );
        if !fee.is_zero() {
            msgs.push(
                BankMsg::Send {
                    to_address: config.owner.to_string(),
                    amount: coins(fee.u128(), &config.denom),
                }
                .into(),
            );
        }
    } else {
        nonpayable(&info)?;
        let token = listing
            .payment_token
            .clone()
            .ok_or(ContractError::Erc20PaymentRequired {})?;
        let cw20 = Cw20Contract(token);
        // pulled against the buyer's allowance; reverts the whole purchase
        // if the approval does not cover the price
        msgs.push(cw20.call(Cw20ExecuteMsg::TransferFrom {
            owner: info.sender.to_string(),
            recipient: listing.owner.to_string(),
            amount: seller_net,
        })?);
        if !fee.is_zero() {
            msgs.push(cw20.call(Cw20ExecuteMsg::TransferFrom {
                owner: info.sender.to_string(),
                recipient: config.owner.to_string(),
                amount: fee,
            })?);
        }
    }

    msgs.push(
        WasmMsg::Execute {
            contract_addr: listing.nft_contract.to_string(),
            msg: to_json_binary(&Cw721ExecuteMsg::TransferNft {
                recipient: info.sender.to_string(),
                token_id: listing.token_id.clone(),
            })?,
            funds: vec![],
        }
        .into(),
    );

    listing.sold = true;
    LISTINGS.save(deps.storage, listing_id, &listing)?;

    Ok(Response::new()
        .add_attribute("action", "buy_nft")
        .add_attribute("listing_id", listing_id.to_string())
        .add_attribute("buyer", info.sender)
        .add_attribute("seller", listing.owner)
        .add_attribute("price", listing.price.to_string())
        .add_messages(msgs))
}

pub fn execute_offer(
    deps: DepsMut,
    env: Env,
    info: MessageInfo,
    listing_id: u64,
    amount: Uint128,
) -> Result<Response, ContractError> {
    let listing = LISTINGS.load(deps.storage, listing_id)?;

    if listing.sold {
        return Err(ContractError::AlreadySold {});
    }
    if listing.owner == info.sender {
        return Err(ContractError::OwnerCannotOffer {});
    }

    let config = CONFIG.load(deps.storage)?;

    let (offer_amount, coin_type) = if listing.is_native {
        // the attached funds are the bid, the amount parameter stays unused
        if !amount.is_zero() {
            return Err(ContractError::CannotOfferErc20 {});
        }
        let paid = must_pay(&info, &config.denom)?;
        if paid < listing.min_offer {
            return Err(ContractError::InvalidOffer {
                min_offer: listing.min_offer,
            });
        }
        (paid, CoinType::Native)
    } else {
        nonpayable(&info)?;
        if amount < listing.min_offer {
            return Err(ContractError::InvalidOffer {
                min_offer: listing.min_offer,
            });
        }
        let token = listing
            .payment_token
            .clone()
            .ok_or(ContractError::Erc20PaymentRequired {})?;
        let allowance: AllowanceResponse = deps.querier.query_wasm_smart(
            token.to_string(),
            &Cw20QueryMsg::Allowance {
                owner: info.sender.to_string(),
                spender: env.contract.address.to_string(),
            },
        )?;
        if allowance.allowance < amount {
            return Err(ContractError::InsufficientAllowance {});
        }
        (amount, CoinType::Cw20)
    };

    let mut msgs: Vec<CosmosMsg> = vec![];
    // a bidder holds one pending offer per listing; a repeat bid replaces
    // it and hands back whatever was escrowed for the old one
    let offer_id = match OFFERS_BY_BIDDER.may_load(deps.storage, (listing_id, &info.sender))? {
        Some(existing) => {
            let prior = OFFERS.load(deps.storage, existing)?;
            if prior.coin_type == CoinType::Native {
                msgs.push(
                    BankMsg::Send {
                        to_address: info.sender.to_string(),
                        amount: coins(prior.amount.u128(), &config.denom),
                    }
                    .into(),
                );
            }
            existing
        }
        None => next_offer_id(deps.storage)?,
    };

    let offer = Offer {
        listing_id,
        offerrer: info.sender.clone(),
        amount: offer_amount,
        coin_type,
        accepted: false,
    };
    OFFERS.save(deps.storage, offer_id, &offer)?;
    OFFERS_BY_BIDDER.save(deps.storage, (listing_id, &info.sender), &offer_id)?;

    Ok(Response::new()
        .add_attribute("action", "offer")
        .add_attribute("offer_id", offer_id.to_string())
        .add_attribute("listing_id", listing_id.to_string())
        .add_attribute("offerrer", info.sender)
        .add_attribute("amount", offer_amount.to_string())
        .add_messages(msgs))
}

pub fn execute_accept_offer(
    deps: DepsMut,
    info: MessageInfo,
    offer_id: u64,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let mut offer = OFFERS.load(deps.storage, offer_id)?;
    let mut listing = LISTINGS.load(deps.storage, offer.listing_id)?;

    if listing.owner != info.sender {
        return Err(ContractError::UnauthorizedSeller {});
    }
    if listing.sold {
        return Err(ContractError::AlreadySold {});
    }

    let config = CONFIG.load(deps.storage)?;
    let fee = config.fee.of(offer.amount);
    let seller_net = offer.amount - fee;

    let mut msgs: Vec<CosmosMsg> = vec![];
    match offer.coin_type {
        CoinType::Native => {
            // bid has been sitting in contract escrow since the offer call
            msgs.push(
                BankMsg::Send {
                    to_address: listing.owner.to_string(),
                    amount: coins(seller_net.u128(), &config.denom),
                }
                .into(),
            );
            if !fee.is_zero() {
                msgs.push(
                    BankMsg::Send {
                        to_address: config.owner.to_string(),
                        amount: coins(fee.u128(), &config.denom),
                    }
                    .into(),
                );
            }
        }
        CoinType::Cw20 => {
            let token = listing
                .payment_token
                .clone()
                .ok_or(ContractError::Erc20PaymentRequired {})?;
            let cw20 = Cw20Contract(token);
            msgs.push(cw20.call(Cw20ExecuteMsg::TransferFrom {
                owner: offer.offerrer.to_string(),
                recipient: listing.owner.to_string(),
                amount: seller_net,
            })?);
            if !fee.is_zero() {
                msgs.push(cw20.call(Cw20ExecuteMsg::TransferFrom {
                    owner: offer.offerrer.to_string(),
                    recipient: config.owner.to_string(),
                    amount: fee,
                })?);
            }
        }
    }

    msgs.push(
        WasmMsg::Execute {
            contract_addr: listing.nft_contract.to_string(),
            msg: to_json_binary(&Cw721ExecuteMsg::TransferNft {
                recipient: offer.offerrer.to_string(),
                token_id: listing.token_id.clone(),
            })?,
            funds: vec![],
        }
        .into(),
    );

    listing.sold = true;
    LISTINGS.save(deps.storage, offer.listing_id, &listing)?;
    offer.accepted = true;
    OFFERS.save(deps.storage, offer_id, &offer)?;

    Ok(Response::new()
        .add_attribute("action", "accept_offer")
        .add_attribute("offer_id", offer_id.to_string())
        .add_attribute("listing_id", offer.listing_id.to_string())
        .add_attribute("seller", listing.owner)
        .add_attribute("offerrer", offer.offerrer)
        .add_attribute("amount", offer.amount.to_string())
        .add_messages(msgs))
}

pub fn execute_cancel_offer(
    deps: DepsMut,
    info: MessageInfo,
    offer_id: u64,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let offer = OFFERS.load(deps.storage, offer_id)?;

    if offer.offerrer != info.sender {
        return Err(ContractError::UnauthorizedOfferrer {});
    }
    if offer.accepted {
        return Err(ContractError::OfferAlreadyAccepted {});
    }

    let mut msgs: Vec<CosmosMsg> = vec![];
    if offer.coin_type == CoinType::Native {
        let config = CONFIG.load(deps.storage)?;
        msgs.push(
            BankMsg::Send {
                to_address: offer.offerrer.to_string(),
                amount: coins(offer.amount.u128(), &config.denom),
            }
            .into(),
        );
    }

    OFFERS.remove(deps.storage, offer_id);
    OFFERS_BY_BIDDER.remove(deps.storage, (offer.listing_id, &offer.offerrer));

    Ok(Response::new()
        .add_attribute("action", "cancel_offer")
        .add_attribute("offer_id", offer_id.to_string())
        .add_attribute("offerrer", offer.offerrer)
        .add_messages(msgs))
}

pub fn execute_cancel_listing(
    deps: DepsMut,
    info: MessageInfo,
    listing_id: u64,
) -> Result<Response, ContractError> {
    nonpayable(&info)?;

    let listing = LISTINGS.load(deps.storage, listing_id)?;

    if listing.owner != info.sender {
        return Err(ContractError::UnauthorizedUser {});
    }
    if listing.sold {
        return Err(ContractError::AlreadySold {});
    }

    let release_msg = WasmMsg::Execute {
        contract_addr: listing.nft_contract.to_string(),
        msg: to_json_binary(&Cw721ExecuteMsg::TransferNft {
            recipient: listing.owner.to_string(),
            token_id: listing.token_id.clone(),
        })?,
        funds: vec![],
    };

    LISTINGS.remove(deps.storage, listing_id);

    Ok(Response::new()
        .add_attribute("action", "cancel_listing")
        .add_attribute("listing_id", listing_id.to_string())
        .add_attribute("token_id", listing.token_id)
        .add_message(release_msg))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn migrate(deps: DepsMut, _env: Env, _msg: MigrateMsg) -> Result<Response, ContractError> {
    let requested: Version = CONTRACT_VERSION.parse()?;
    let stored = get_contract_version(deps.storage)?;

    if stored.contract != CONTRACT_NAME {
        return Err(ContractError::CannotMigrate {
            stored: stored.contract,
            requested: CONTRACT_NAME.to_string(),
        });
    }
    let stored_version: Version = stored.version.parse()?;
    if stored_version >= requested {
        return Err(ContractError::CannotMigrate {
            stored: stored.version,
            requested: CONTRACT_VERSION.to_string(),
        });
    }

    set_contract_version(deps.storage, CONTRACT_NAME, CONTRACT_VERSION)?;

    Ok(Response::new()
        .add_attribute("action", "migrate")
        .add_attribute("version", CONTRACT_VERSION))
}

#[cfg_attr(not(feature = "library"), entry_point)]
pub fn query(deps: Deps, _env: Env, msg: QueryMsg) -> StdResult<Binary> {
    match msg {
        QueryMsg::MarketOwner {} => to_json_binary(&query_market_owner(deps)?),
        QueryMsg::GetListing { id } => to_json_binary(&query_listing(deps, id)?),
        QueryMsg::GetOffer { id } => to_json_binary(&query_offer(deps, id)?),
        QueryMsg::GetAllListings { from_index, limit } => {
            to_json_binary(&query_all_listings(deps, from_index, limit)?)
        }
        QueryMsg::GetListingCount {} => to_json_binary(&query_listing_count(deps)?),
        QueryMsg::GetOffersByListing {
            listing_id,
            from_index,
            limit,
        } => to_json_binary(&query_offers_by_listing(deps, listing_id, from_index, limit)?),
    }
}

pub fn query_market_owner(deps: Deps) -> StdResult<Addr> {
    Ok(CONFIG.load(deps.storage)?.owner)
}

pub fn query_listing(deps: Deps, id: u64) -> StdResult<Listing> {
    LISTINGS.load(deps.storage, id)
}

pub fn query_offer(deps: Deps, id: u64) -> StdResult<Offer> {
    OFFERS.load(deps.storage, id)
}

pub fn query_all_listings(
    deps: Deps,
    from_index: Option<u64>,
    limit: Option<u64>,
) -> StdResult<Vec<Listing>> {
    let from_index = from_index.unwrap_or(0);
    let limit = limit.unwrap_or(10);

    LISTINGS
        .range(deps.storage, None, None, Order::Ascending)
        .skip(from_index as usize)
        .take(limit as usize)
        .map(|item| item.map(|(_, listing)| listing))
        .collect()
}

pub fn query_listing_count(deps: Deps) -> StdResult<u64> {
    Ok(LISTINGS
        .keys(deps.storage, None, None, Order::Ascending)
        .count() as u64)
}

pub fn query_offers_by_listing(
    deps: Deps,
    listing_id: u64,
    from_index: Option<u64>,
    limit: Option<u64>,
) -> StdResult<Vec<Offer>> {
    let from_index = from_index.unwrap_or(0);
    let limit = limit.unwrap_or(10);

    OFFERS
        .range(deps.storage, None, None, Order::Ascending)
        .filter(|item| {
            item.as_ref()
                .map(|(_, offer)| offer.listing_id == listing_id)
                .unwrap_or(true)
        })
        .skip(from_index as usize)
        .take(limit as usize)
        .map(|item| item.map(|(_, offer)| offer))
        .collect()
}
