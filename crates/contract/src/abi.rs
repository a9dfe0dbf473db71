use alloy_primitives::{Address, address};
use alloy_sol_types::sol;

/// Address of the deployed staking contract.
pub const STAKER_ADDRESS: Address = address!("0x76c6f2e428eb53d7d3ab818b421edbd50b800309");

sol! {
    /// Staking contract interface.
    #[derive(Debug, PartialEq, Eq)]
    interface IStaker {
        function getBalances() external view returns (uint256 stake, uint256 balance, uint256 reward);
        function increaseStake(uint256 amount) external returns (bool);
        function decreaseStake(uint256 amount) external returns (bool);
        function claimReward() external returns (bool);
        function transfer(address recipient, uint256 amount) external returns (bool);
    }
}
