use async_trait::async_trait;
use stakenode_api_types_beacon::{
    id::{ID, ValidatorID},
    validator::ValidatorData,
};

use super::{
    http_client::ClientWithBaseUrl,
    responses::{BalanceData, BeaconResponse, HeaderData, ValidatorsPostRequest},
};
use crate::{balances::BalanceSource, error::BeaconError, resolver::ValidatorSource};

/// `POST /eth/v1/beacon/states/{state_id}/validators`.
#[derive(Debug, Clone)]
pub struct ValidatorsEndpoint {
    http_client: ClientWithBaseUrl,
}

impl ValidatorsEndpoint {
    pub fn new(http_client: ClientWithBaseUrl) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl ValidatorSource for ValidatorsEndpoint {
    async fn fetch_validators(
        &self,
        state_id: &ID,
        validator_ids: &[ValidatorID],
    ) -> Result<Vec<ValidatorData>, BeaconError> {
        let response: BeaconResponse<Vec<ValidatorData>> = self
            .http_client
            .send_json(
                self.http_client
                    .post(&format!("/eth/v1/beacon/states/{state_id}/validators"))?
                    .json(&ValidatorsPostRequest { ids: validator_ids }),
            )
            .await?;
        Ok(response.data)
    }

    async fn head_slot(&self) -> Result<u64, BeaconError> {
        let response: BeaconResponse<HeaderData> = self
            .http_client
            .send_json(self.http_client.get("/eth/v1/beacon/headers/head")?)
            .await?;
        Ok(response.data.header.message.slot)
    }
}

/// `POST /eth/v1/beacon/states/{state_id}/validator_balances`.
#[derive(Debug, Clone)]
pub struct BalancesEndpoint {
    http_client: ClientWithBaseUrl,
}

impl BalancesEndpoint {
    pub fn new(http_client: ClientWithBaseUrl) -> Self {
        Self { http_client }
    }
}

#[async_trait]
impl BalanceSource for BalancesEndpoint {
    async fn fetch_balances(
        &self,
        state_id: &ID,
        indices: &[u64],
    ) -> Result<Vec<(u64, u64)>, BeaconError> {
        let ids = indices.iter().map(u64::to_string).collect::<Vec<_>>();
        let response: BeaconResponse<Vec<BalanceData>> = self
            .http_client
            .send_json(
                self.http_client
                    .post(&format!(
                        "/eth/v1/beacon/states/{state_id}/validator_balances"
                    ))?
                    .json(&ids),
            )
            .await?;
        Ok(response
            .data
            .into_iter()
            .map(|balance| (balance.index, balance.balance))
            .collect())
    }
}
