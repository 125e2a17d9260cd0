use alloy::primitives::{Address, address};
use alloy::sol;

pub const CONTRACT_ADDRESS: Address = address!("0x035efEe092383e2baFdAAAacF79167c55178fa59");

/// Chainlink ETH/USD aggregator on Sepolia.
pub const ETH_USD_FEED_ADDRESS: Address = address!("0x694AA1769357215DE4FAC081bf1f309aDC325306");

pub const PRICE_FEED_DECIMALS: i32 = 8;

pub const SEPOLIA_CHAIN_ID: u64 = 11_155_111;

sol! {
    #[allow(missing_docs)]
    #[derive(Debug, PartialEq, Eq)]
    #[sol(rpc)]
    contract BuyMeACoffee {
        struct Creator {
            string name;
            string about;
            address owner;
            uint256 totalReceived;
        }

        struct Memo {
            address from;
            uint256 timestamp;
            string name;
            string message;
        }

        error AlreadyRegistered();
        error CreatorNotRegistered();
        error EmptyName();
        error NoFundsSent();
        error NoFundsToWithdraw();
        error NotACreator();
        error WithdrawFailed();

        event CreatorRegistered(address indexed creator, string name, string about);
        event CreatorUpdated(address indexed creator, string name, string about);
        event FundsWithdrawn(address indexed creator, uint256 amount);
        event NewCoffee(
            address indexed creator,
            address indexed from,
            uint256 amount,
            uint256 timestamp,
            string name,
            string message
        );

        function registerCreator(string _name, string _about) external;
        function updateCreator(string _name, string _about) external;
        function buyCoffee(address _creator, string _name, string _message) external payable;
        function withdraw() external;

        function getCreator(address _creator) external view returns (Creator memory);
        function getCreatorByName(string _name) external view returns (Creator memory);
        function getMemos(address _creator) external view returns (Memo[] memory);
        function getMemosPaginated(address _creator, uint256 _offset, uint256 _limit) external view returns (Memo[] memory);
        function getCreatorBalance(address _creator) external view returns (uint256);
        function getMemoCount(address _creator) external view returns (uint256);
    }
}

sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface AggregatorV3Interface {
        function decimals() external view returns (uint8);
        function latestRoundData() external view returns (
            uint80 roundId,
            int256 answer,
            uint256 startedAt,
            uint256 updatedAt,
            uint80 answeredInRound
        );
    }
}

/// Name of the custom error a reverted call carried.
pub fn revert_name(err: &BuyMeACoffee::BuyMeACoffeeErrors) -> &'static str {
    use BuyMeACoffee::BuyMeACoffeeErrors as E;
    match err {
        E::AlreadyRegistered(_) => "AlreadyRegistered",
        E::CreatorNotRegistered(_) => "CreatorNotRegistered",
        E::EmptyName(_) => "EmptyName",
        E::NoFundsSent(_) => "NoFundsSent",
        E::NoFundsToWithdraw(_) => "NoFundsToWithdraw",
        E::NotACreator(_) => "NotACreator",
        E::WithdrawFailed(_) => "WithdrawFailed",
    }
}
