//! Modals raised in response to backend results.

use crate::ui::{Modal, ModalAction};
use sonic_core::{BackendError, OperationResponse};

pub fn transaction_sent(response: &OperationResponse) -> Modal {
    Modal::info("Success!")
        .line("Transaction succeeded! Transaction hash:")
        .line(response.hash.clone().unwrap_or_default())
        .on_confirm(ModalAction::TransactionCancel)
}

pub fn transaction_failed(response: &OperationResponse) -> Modal {
    Modal::danger("Error!")
        .line("The transaction was not successful.")
        .line(response.error_message())
        .on_confirm(ModalAction::TransactionCancel)
}

pub fn password_changed() -> Modal {
    Modal::info("Success!")
        .line("The password was changed successfully. Take care not to forget it.")
        .on_confirm(ModalAction::OpenNewWallet)
}

pub fn password_change_failed(error: Option<&BackendError>) -> Modal {
    match error {
        Some(e) if e.is_code(BackendError::AUTH) => Modal::danger("Incorrect Password!")
            .line("You did not enter your current password correctly. Please try again."),
        Some(e) if e.is_code(BackendError::SAVE) => Modal::danger("Error!").line(
            "The password was not changed successfully because the wallet could not be \
             saved to disk. Check that you have write permissions to the file and try again.",
        ),
        other => Modal::danger("Error!")
            .line("The password was not changed.")
            .line(other.map(BackendError::message).unwrap_or_default()),
    }
}

pub fn wallet_saved() -> Modal {
    Modal::info("Wallet Saved!").line("The wallet was saved successfully.")
}

pub fn wallet_save_failed() -> Modal {
    Modal::danger("Save Error!").line(
        "The wallet did not save successfully. Check your directory permissions and try again.",
    )
}

pub fn rescanning(height: &str) -> Modal {
    Modal::info("Success!")
        .line(format!(
            "Your wallet is now rescanning from block {height}. Patience is a virtue!"
        ))
        .on_confirm(ModalAction::TransactionCancel)
}

pub fn wallet_open_error(error: &BackendError) -> Modal {
    Modal::danger("Wallet Open Error!").line(error.message())
}

pub fn ledger_prompt() -> Modal {
    Modal::info("Ledger").line("Please follow the prompts on your ledger.")
}
