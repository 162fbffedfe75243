//! Smart contract addresses and REST endpoints served by the network.

pub const STORAGE_SMART_CONTRACT_ADDRESS: &str =
    "6dba10422e368813802877a85039d3985d96760ed844092319743fb3a76712d7";
pub const FAUCET_SMART_CONTRACT_ADDRESS: &str =
    "6dba10422e368813802877a85039d3985d96760ed844092319743fb3a76712d3";
pub const MINER_SMART_CONTRACT_ADDRESS: &str =
    "6dba10422e368813802877a85039d3985d96760ed844092319743fb3a76712d1";
pub const INTEREST_POOL_SMART_CONTRACT_ADDRESS: &str =
    "cf8d0df9bd8cc637a4ff4e792ffe3686da6220c45f0e1103baa609f3f1751ef4";
pub const VESTING_SMART_CONTRACT_ADDRESS: &str =
    "2bba5b05949ea59c80aed3ac3474d7379d3be737e8eb5a968c52295e48333ead";

pub const GET_BALANCE: &str = "/v1/client/get/balance";

pub const GET_USER_POOLS: &str =
    "/v1/screst/6dba10422e368813802877a85039d3985d96760ed844092319743fb3a76712d1/getUserPools";

pub const GET_LOCKED_TOKENS: &str =
    "/v1/screst/cf8d0df9bd8cc637a4ff4e792ffe3686da6220c45f0e1103baa609f3f1751ef4/getPoolsStats";
pub const GET_LOCK_CONFIG: &str =
    "/v1/screst/cf8d0df9bd8cc637a4ff4e792ffe3686da6220c45f0e1103baa609f3f1751ef4/getLockConfig";

pub const SC_REST_READPOOL_STATS: &str =
    "/v1/screst/6dba10422e368813802877a85039d3985d96760ed844092319743fb3a76712d7/getReadPoolStat";
pub const SC_REST_WRITEPOOL_STATS: &str =
    "/v1/screst/6dba10422e368813802877a85039d3985d96760ed844092319743fb3a76712d7/getWritePoolStat";
pub const SC_REST_ALLOCATIONS: &str =
    "/v1/screst/6dba10422e368813802877a85039d3985d96760ed844092319743fb3a76712d7/allocations";
pub const SC_REST_ALLOCATION_MIN_LOCK: &str =
    "/v1/screst/6dba10422e368813802877a85039d3985d96760ed844092319743fb3a76712d7/allocation_min_lock";

pub const VP_GET_CONFIG: &str =
    "/v1/screst/2bba5b05949ea59c80aed3ac3474d7379d3be737e8eb5a968c52295e48333ead/getConfig";

/// Smart contract method names carried in transaction payloads.
pub mod method {
    pub const POUR: &str = "pour";
    pub const LOCK: &str = "lock";
    pub const NEW_READ_POOL: &str = "new_read_pool";
    pub const NEW_ALLOCATION: &str = "new_allocation_request";
    pub const UPDATE_ALLOCATION: &str = "update_allocation_request";
    pub const ADD_TO_DELEGATE_POOL: &str = "addToDelegatePool";
    pub const DELETE_FROM_DELEGATE_POOL: &str = "deleteFromDelegatePool";
    pub const STAKE_POOL_LOCK: &str = "stake_pool_lock";
    pub const STAKE_POOL_UNLOCK: &str = "stake_pool_unlock";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rest_endpoints_target_their_contract() {
        for endpoint in [
            SC_REST_READPOOL_STATS,
            SC_REST_WRITEPOOL_STATS,
            SC_REST_ALLOCATIONS,
            SC_REST_ALLOCATION_MIN_LOCK,
        ] {
            assert!(endpoint.contains(STORAGE_SMART_CONTRACT_ADDRESS));
        }
        assert!(GET_USER_POOLS.contains(MINER_SMART_CONTRACT_ADDRESS));
        assert!(GET_LOCKED_TOKENS.contains(INTEREST_POOL_SMART_CONTRACT_ADDRESS));
        assert!(GET_LOCK_CONFIG.contains(INTEREST_POOL_SMART_CONTRACT_ADDRESS));
        assert!(VP_GET_CONFIG.contains(VESTING_SMART_CONTRACT_ADDRESS));
    }
}
